//! Extraction of the review-request reference from a commit message.
use std::sync::LazyLock;

use regex::Regex;

static REVISION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Differential Revision: (https://phabricator\.services\.mozilla\.com/D([0-9]+))")
        .unwrap()
});

/// Review request referenced by a commit message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRequest {
    pub id: u64,
    pub url: String,
}

/// Find the first review-request reference in `desc`.
pub fn parse_review_request(desc: &str) -> Option<ReviewRequest> {
    let caps = REVISION_RE.captures(desc)?;
    let id = caps.get(2)?.as_str().parse().ok()?;
    let url = caps.get(1)?.as_str().to_string();
    Some(ReviewRequest { id, url })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESC: &str = "Bug 1 - Fix the thing r=someone\n\n\
                        Differential Revision: https://phabricator.services.mozilla.com/D5678";

    #[test]
    fn test_parse_review_request() {
        assert_eq!(
            parse_review_request(DESC),
            Some(ReviewRequest {
                id: 5678,
                url: "https://phabricator.services.mozilla.com/D5678".to_string(),
            })
        );
    }

    #[test]
    fn test_parse_inline_reference() {
        let desc = "Commit [(b'A', b'file')]Differential Revision: https://phabricator.services.mozilla.com/D1";
        let request = parse_review_request(desc).unwrap();
        assert_eq!(request.id, 1);
        assert_eq!(request.url, "https://phabricator.services.mozilla.com/D1");
    }

    #[test]
    fn test_no_reference() {
        assert_eq!(parse_review_request("Bug 2 - No review link"), None);
        assert_eq!(
            parse_review_request("Differential Revision: https://example.com/D12"),
            None
        );
    }

    #[test]
    fn test_first_reference_wins() {
        let desc = "Differential Revision: https://phabricator.services.mozilla.com/D3\n\
                    Differential Revision: https://phabricator.services.mozilla.com/D4";
        assert_eq!(parse_review_request(desc).map(|r| r.id), Some(3));
    }
}
