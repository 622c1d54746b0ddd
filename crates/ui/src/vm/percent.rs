/// `part / whole` as a whole percentage, rounded half up. Zero when `whole` is zero.
pub(crate) fn percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let pct = (part.min(whole) * 200 + whole) / (whole * 2);
    u32::try_from(pct).unwrap_or(100)
}
