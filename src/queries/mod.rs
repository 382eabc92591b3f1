pub mod activity_queries;
pub mod product_queries;
pub mod transaction_queries;
pub mod user_queries;

const DEFAULT_PAGE_SIZE: i64 = 20;
const MAX_PAGE_SIZE: i64 = 100;

/// Normalizes client paging input into a `(limit, offset)` pair.
pub(crate) fn page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

/// Builds a `%term%` pattern matching `term` literally (backslash escape).
pub(crate) fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_terms_match_literally() {
        assert_eq!(contains_pattern(" batik "), "%batik%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern("c:\\x"), "%c:\\\\x%");
    }

    #[test]
    fn paging_defaults_and_bounds() {
        assert_eq!(page(None, None), (20, 0));
        assert_eq!(page(Some(500), Some(40)), (100, 40));
        assert_eq!(page(Some(0), Some(-5)), (1, 0));
    }
}
