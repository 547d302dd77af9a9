/// Windowed pagination controls derived from the server's pagination meta.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageControls {
    /// Numbered buttons, at most five of them.
    pub pages: Vec<u32>,
    /// Single trailing ellipsis before the last-page link. Never leading.
    pub ellipsis: bool,
    /// Explicit link to the last page when there are more than five pages.
    pub last: Option<u32>,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub current: u32,
}

/// Computes the page-button window: up to five numbers starting at
/// `max(1, current - 2)`, clipped to the total page count. Returns `None`
/// when the whole pagination block is suppressed (one page or fewer).
pub fn page_controls(current: u32, total: u32) -> Option<PageControls> {
    if total <= 1 {
        return None;
    }

    let start = current.saturating_sub(2).max(1);
    let pages: Vec<u32> = (0..5).map(|i| start + i).filter(|p| *p <= total).collect();
    let overflow = total > 5;

    Some(PageControls {
        pages,
        ellipsis: overflow,
        last: overflow.then_some(total),
        prev_enabled: current > 1,
        next_enabled: current < total,
        current,
    })
}
