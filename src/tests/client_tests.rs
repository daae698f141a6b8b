use super::MockBackend;
use crate::{Client, Error, Verb};

#[test]
fn verb_entry_points_set_method_and_url() {
    let backend = MockBackend::ok("");
    let requests = [
        (backend.get("http://localhost").unwrap(), Verb::Get),
        (backend.post("http://localhost").unwrap(), Verb::Post),
        (backend.put("http://localhost").unwrap(), Verb::Put),
        (backend.patch("http://localhost").unwrap(), Verb::Patch),
        (backend.delete("http://localhost").unwrap(), Verb::Delete),
    ];
    for (request, verb) in requests {
        assert_eq!(request.method(), verb);
        assert_eq!(request.original_url(), "http://localhost");
    }
}

#[test]
fn verb_entry_points_validate_url() {
    let backend = MockBackend::ok("");
    assert!(matches!(
        backend.get("not-a-url"),
        Err(Error::InvalidArgument(_))
    ));
    assert!(matches!(
        backend.patch("about:blank"),
        Err(Error::InvalidArgument(_))
    ));
}

#[cfg(feature = "curl-backend")]
#[test]
fn crate_level_functions_use_default_backend() {
    let request = crate::get("http://localhost").unwrap();
    assert_eq!(request.method(), Verb::Get);
    assert_eq!(request.original_url(), "http://localhost");

    assert_eq!(crate::post("http://localhost").unwrap().method(), Verb::Post);
    assert_eq!(crate::put("http://localhost").unwrap().method(), Verb::Put);
    assert_eq!(crate::patch("http://localhost").unwrap().method(), Verb::Patch);
    assert_eq!(crate::delete("http://localhost").unwrap().method(), Verb::Delete);
    assert!(crate::delete("news://localhost").is_err());
}
