use std::path::Path;

/// Address Chrome should open for what was passed to `--url`.
///
/// Anything carrying a scheme is kept. A saved page on disk becomes a
/// `file://` URL. Loopback hosts get `http://`; every other host `https://`.
pub fn page_url(input: &str) -> String {
    let input = input.trim();

    if input.contains("://") || input.starts_with("data:") || input.starts_with("about:") {
        return input.to_string();
    }

    let path = Path::new(input);
    if path.is_file() {
        return match path.canonicalize() {
            Ok(absolute) => format!("file://{}", absolute.display()),
            Err(e) => {
                log::debug!("Cannot resolve {}: {}", input, e);
                format!("file://{}", input)
            }
        };
    }

    let host = input.split(['/', ':']).next().unwrap_or_default();
    if host == "localhost" || host.starts_with("127.") {
        format!("http://{}", input)
    } else {
        format!("https://{}", input)
    }
}

/// `data:` URL rendering `html`, for loading a document into a tab
pub fn html_data_url(html: &str) -> String {
    format!("data:text/html;charset=utf-8,{}", urlencoding::encode(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url_keeps_schemes() {
        assert_eq!(page_url("https://www.elastic.co/support/matrix"), "https://www.elastic.co/support/matrix");
        assert_eq!(page_url("file:///tmp/matrix.html"), "file:///tmp/matrix.html");
        assert_eq!(page_url("about:blank"), "about:blank");
    }

    #[test]
    fn test_page_url_hosts() {
        assert_eq!(page_url("  elastic.co/support/matrix "), "https://elastic.co/support/matrix");
        assert_eq!(page_url("localhost:3000/matrix"), "http://localhost:3000/matrix");
        assert_eq!(page_url("127.0.0.1:8080"), "http://127.0.0.1:8080");
    }

    #[test]
    fn test_page_url_saved_file() {
        let manifest = concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml");
        let url = page_url(manifest);

        assert!(url.starts_with("file:///"), "{url}");
        assert!(url.ends_with("/Cargo.toml"), "{url}");
    }

    #[test]
    fn test_html_data_url() {
        let html = "<td>✓ 8.1</td>";
        let url = html_data_url(html);
        assert!(url.starts_with("data:text/html;charset=utf-8,"));
        assert!(!url.contains('<'));

        let encoded = url.trim_start_matches("data:text/html;charset=utf-8,");
        assert_eq!(urlencoding::decode(encoded).unwrap(), html);
    }
}
