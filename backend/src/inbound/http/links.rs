//! Hypermedia link construction for paginated listings.

use actix_web::HttpRequest;
use pagination::{Cursor, NumberedPage, PageLinks, with_cursor};
use serde::Serialize;
use url::Url;

/// Numbered-page listing body: the page envelope plus navigation links.
#[derive(Debug, Serialize)]
pub(crate) struct PagedResponse<T> {
    #[serde(flatten)]
    pub page: NumberedPage<T>,
    pub links: PageLinks,
}

/// Reconstruct the absolute URL of the current request. Returns `None`
/// when the connection info does not assemble into a parseable URL, in
/// which case listings simply omit their links.
fn request_url(req: &HttpRequest) -> Option<Url> {
    let info = req.connection_info();
    Url::parse(&format!("{}://{}{}", info.scheme(), info.host(), req.uri())).ok()
}

/// Navigation links for a cursor-paged listing.
pub(crate) fn cursor_links(
    req: &HttpRequest,
    next_cursor: Option<&str>,
    previous_cursor: Option<&str>,
) -> PageLinks {
    let base = request_url(req);
    let link = |raw: &str| {
        Cursor::decode(raw)
            .ok()
            .and_then(|cursor| base.as_ref().map(|base| with_cursor(base, &cursor).to_string()))
    };
    PageLinks {
        next: next_cursor.and_then(|raw| link(raw)),
        previous: previous_cursor.and_then(|raw| link(raw)),
    }
}

fn with_page(base: &Url, page: usize) -> Url {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(name, _)| name != "page")
        .map(|(name, value)| (name.into_owned(), value.into_owned()))
        .collect();
    let mut target = base.clone();
    target
        .query_pairs_mut()
        .clear()
        .extend_pairs(retained)
        .append_pair("page", &page.to_string());
    target
}

/// Next and previous links for a numbered-page listing.
pub(crate) fn page_links<T>(req: &HttpRequest, page: &NumberedPage<T>) -> PageLinks {
    let Some(base) = request_url(req) else {
        return PageLinks::default();
    };
    let next = (page.current_page < page.total_pages)
        .then(|| with_page(&base, page.current_page + 1).to_string());
    let previous = (page.current_page > 1)
        .then(|| with_page(&base, page.current_page - 1).to_string());
    PageLinks { next, previous }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn page_links_walk_both_directions() {
        let req = TestRequest::get()
            .uri("/api/users?page=2&search=ada")
            .to_http_request();
        let page = NumberedPage::paginate((0..30).collect::<Vec<_>>(), 2, 10);
        let links = page_links(&req, &page);
        let next = links.next.expect("next link");
        assert!(next.contains("page=3"));
        assert!(next.contains("search=ada"));
        let previous = links.previous.expect("previous link");
        assert!(previous.contains("page=1"));
    }

    #[test]
    fn first_and_last_pages_drop_the_unavailable_direction() {
        let req = TestRequest::get().uri("/api/users").to_http_request();
        let page = NumberedPage::paginate((0..5).collect::<Vec<_>>(), 1, 10);
        let links = page_links(&req, &page);
        assert!(links.next.is_none());
        assert!(links.previous.is_none());
    }

    #[test]
    fn cursor_links_embed_the_continuation() {
        let req = TestRequest::get()
            .uri("/api/snippets?language=python")
            .to_http_request();
        let cursor = Cursor::new(7, "id-1").encode();
        let links = cursor_links(&req, Some(&cursor), None);
        let next = links.next.expect("next link");
        assert!(next.contains("language=python"));
        assert!(next.contains(&format!("cursor={cursor}")));
        assert!(links.previous.is_none());
    }

    #[test]
    fn cursor_links_carry_the_backward_direction() {
        let req = TestRequest::get().uri("/api/snippets").to_http_request();
        let previous = Cursor::backward(7, "id-1").encode();
        let links = cursor_links(&req, None, Some(&previous));
        assert!(links.next.is_none());
        let link = links.previous.expect("previous link");
        assert!(link.contains(&format!("cursor={previous}")));
    }
}
