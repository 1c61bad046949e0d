use getserver::config::ContentConfig;
use getserver::http::resolver::{ResolvedTarget, Resolver};

#[test]
fn test_resolve_root_to_index() {
    let r = Resolver::default();
    assert_eq!(
        r.resolve("GET / HTTP/1.1"),
        ResolvedTarget::File {
            path: "html/index.html".to_string(),
            name: "index.html".to_string(),
        }
    );
}

#[test]
fn test_resolve_plain_file() {
    let r = Resolver::default();
    assert_eq!(r.resolve("GET /style.css HTTP/1.1").path(), Some("html/style.css"));
}

#[test]
fn test_resolve_nested_path_untouched() {
    let r = Resolver::default();
    assert_eq!(
        r.resolve("GET /src/js/app.js HTTP/1.1").path(),
        Some("html/src/js/app.js")
    );
}

#[test]
fn test_resolve_too_few_tokens_is_invalid() {
    let r = Resolver::default();
    for line in ["", "GET", "GET/index.html", "\r"] {
        assert!(r.resolve(line).is_invalid(), "{line:?}");
    }
}

#[test]
fn test_resolve_two_tokens_is_enough() {
    let r = Resolver::default();
    assert_eq!(r.resolve("GET /a.html").path(), Some("html/a.html"));
}

#[test]
fn test_resolve_trailing_space_is_invalid() {
    let r = Resolver::default();
    assert!(r.resolve("GET ").is_invalid());
    assert!(r.resolve("GET    ").is_invalid());
    assert!(r.resolve(" GET").is_invalid());
}

#[test]
fn test_resolve_repeated_spaces_keep_target() {
    let r = Resolver::default();
    assert_eq!(
        r.resolve("GET  /style.css HTTP/1.1").path(),
        Some("html/style.css")
    );
    assert_eq!(r.resolve("  GET /  HTTP/1.1").path(), Some("html/index.html"));
}

#[test]
fn test_resolve_strips_exactly_one_character() {
    let r = Resolver::default();
    assert_eq!(r.resolve("GET //a.html HTTP/1.1").path(), Some("html//a.html"));
    assert_eq!(r.resolve("GET xa.html HTTP/1.1").path(), Some("html/a.html"));
    assert_eq!(r.resolve("GET // HTTP/1.1").path(), Some("html//"));
}

#[test]
fn test_resolve_does_not_normalise_or_decode() {
    let r = Resolver::default();
    assert_eq!(
        r.resolve("GET /../secret.txt HTTP/1.1").path(),
        Some("html/../secret.txt")
    );
    assert_eq!(
        r.resolve("GET /a%20b.html HTTP/1.1").path(),
        Some("html/a%20b.html")
    );
}

#[test]
fn test_resolve_is_pure() {
    let r = Resolver::default();
    let line = "GET /logo.png HTTP/1.1";
    assert_eq!(r.resolve(line), r.resolve(line));
}

#[test]
fn test_resolver_from_config() {
    let cfg = ContentConfig {
        document_root: "/srv/site".to_string(),
        index_file: "home.html".to_string(),
        server_name: "x".to_string(),
    };
    let r = Resolver::from_config(&cfg);

    assert_eq!(r.document_root(), "/srv/site");
    assert_eq!(r.resolve("GET / HTTP/1.1").path(), Some("/srv/site/home.html"));
}
