use serde::Serialize;

/// Number of page buttons a pager shows before collapsing into ellipses.
pub const DEFAULT_MAX_PAGES_TO_SHOW: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "page")]
pub enum PageMarker {
    Page(u32),
    Ellipsis,
}

/// Compute the page buttons for a pager.
///
/// Short ranges are returned verbatim. Longer ones always keep the first and
/// last page and a window around `current_page`, with an ellipsis standing in
/// for each hidden run. Near either end the window is pinned so the number of
/// visible buttons stays stable.
pub fn page_window(current_page: u32, total_pages: u32, max_pages_to_show: u32) -> Vec<PageMarker> {
    // A lone page is listed once even when the window is zero wide.
    if total_pages <= max_pages_to_show.max(1) {
        return (1..=total_pages).map(PageMarker::Page).collect();
    }

    let current = current_page.clamp(1, total_pages);
    let last_inner = total_pages - 1;
    // Slots between the first and last button.
    let inner = max_pages_to_show.saturating_sub(2).max(1);
    let half = (inner - 1) / 2;

    let mut start = current.saturating_sub(half).max(2);
    let mut end = current.saturating_add(half).min(last_inner);

    if current <= 2 {
        end = (1 + inner).min(last_inner);
    }
    if current >= last_inner {
        start = total_pages.saturating_sub(inner).max(2);
    }

    let mut markers = Vec::with_capacity(end.saturating_sub(start) as usize + 5);
    markers.push(PageMarker::Page(1));
    if start > 2 {
        markers.push(PageMarker::Ellipsis);
    }
    markers.extend((start..=end).map(PageMarker::Page));
    if end < last_inner {
        markers.push(PageMarker::Ellipsis);
    }
    markers.push(PageMarker::Page(total_pages));
    markers
}

/// Everything a pager widget needs to render: the page buttons plus the
/// targets of the previous/next controls (`None` when disabled).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pager {
    pub current: u32,
    pub total_pages: u32,
    pub markers: Vec<PageMarker>,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl Pager {
    pub fn new(current: u32, total_pages: u32) -> Self {
        Self::with_max(current, total_pages, DEFAULT_MAX_PAGES_TO_SHOW)
    }

    pub fn with_max(current: u32, total_pages: u32, max_pages_to_show: u32) -> Self {
        let current = current.clamp(1, total_pages.max(1));
        let prev = (total_pages > 1 && current > 1).then(|| current - 1);
        let next = (total_pages > 1 && current < total_pages).then(|| current + 1);

        Self {
            current,
            total_pages,
            markers: page_window(current, total_pages, max_pages_to_show),
            prev,
            next,
        }
    }

    /// A pager with a single page (or none) has nothing to navigate to.
    pub fn is_navigable(&self) -> bool {
        self.total_pages > 1
    }
}
