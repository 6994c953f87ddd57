/// Page size and continuation token for list operations.
///
/// The token is opaque: it is passed back to the service exactly as received.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PageRequest {
    /// Maximum number of items to return. `None` or `0` leaves the choice to
    /// the service.
    pub page_size: Option<u32>,
    /// `nextPageToken` from the previous page.
    pub page_token: Option<String>,
}

impl PageRequest {
    /// First page with the service's default size.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_page_token(mut self, page_token: impl Into<String>) -> Self {
        self.page_token = Some(page_token.into());
        self
    }

    /// Query pairs in wire order; zero sizes and empty tokens are omitted.
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(size) = self.page_size.filter(|size| *size > 0) {
            pairs.push(("pageSize", size.to_string()));
        }
        pairs.extend(token_pair(self.page_token.as_deref()));
        pairs
    }
}

pub(crate) fn token_pair(page_token: Option<&str>) -> Option<(&'static str, String)> {
    page_token
        .filter(|token| !token.is_empty())
        .map(|token| ("nextPageToken", token.to_owned()))
}

/// Builds the follow-up request for a list response, if there is one.
pub(crate) fn next_page(
    next_page_token: Option<&str>,
    page_size: Option<u32>,
) -> Option<PageRequest> {
    let token = next_page_token.filter(|token| !token.is_empty())?;
    Some(PageRequest {
        page_size,
        page_token: Some(token.to_owned()),
    })
}

#[cfg(test)]
mod tests {
    use super::{next_page, PageRequest};

    #[test]
    fn default_page_has_no_query() {
        assert!(PageRequest::new().query_pairs().is_empty());
    }

    #[test]
    fn empty_token_and_zero_size_are_omitted() {
        let page = PageRequest::new().with_page_size(0).with_page_token("");
        assert!(page.query_pairs().is_empty());
    }

    #[test]
    fn size_precedes_token() {
        let page = PageRequest::new().with_page_token("abc").with_page_size(10);
        assert_eq!(
            page.query_pairs(),
            vec![("pageSize", "10".to_owned()), ("nextPageToken", "abc".to_owned())]
        );
    }

    #[test]
    fn next_page_keeps_size_and_stops_at_end() {
        let next = next_page(Some("t2"), Some(5)).expect("token means more pages");
        assert_eq!(next, PageRequest::new().with_page_size(5).with_page_token("t2"));
        assert_eq!(next_page(None, Some(5)), None);
        assert_eq!(next_page(Some(""), Some(5)), None);
    }
}
