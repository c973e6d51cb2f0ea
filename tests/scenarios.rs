use std::collections::HashMap;
use std::io::Write;

use rustynet_message::{
    CursorState, FileStream, HttpMessage, Message, MessageError, ParamTable, Request,
    ServerRequest, UploadedFile, Uri,
};

fn form_post() -> ServerRequest {
    ServerRequest::new("POST", Uri::new("/form"), [("REQUEST_METHOD", "POST")])
}

#[test]
fn content_type_change_hides_body_params() {
    let mut req = form_post();
    req.set_header("Content-Type", "application/x-www-form-urlencoded")
        .unwrap();

    let mut params = ParamTable::new();
    params.insert("a".to_string(), "1".to_string());
    req.set_body_params(params);
    assert_eq!(req.body_param("a"), "1");

    req.set_header("Content-Type", "text/plain").unwrap();
    assert_eq!(req.body_param("a"), "");
}

#[test]
fn accept_header_set_then_appended() {
    let mut msg = Message::new();
    msg.set_header("Accept", "text/html").unwrap();
    msg.add_header("Accept", "application/json").unwrap();
    assert_eq!(msg.header_line("Accept"), "text/html, application/json");

    let mut values = msg.header("accept");
    assert!(values.next());
    assert_eq!(values.value().unwrap(), "text/html");
    assert!(values.next());
    assert_eq!(values.value().unwrap(), "application/json");
    assert!(!values.next());
}

#[test]
fn cursor_law_holds_for_message_sequences() {
    let mut msg = Message::new();
    msg.set_header("A", "1").unwrap();

    let mut headers = msg.headers();
    assert!(matches!(
        headers.name(),
        Err(MessageError::InvalidCursorState(CursorState::NotStarted))
    ));
    assert!(headers.next());
    assert!(!headers.next());
    assert!(!headers.next());
    assert!(headers.values().is_err());

    headers.reset();
    assert!(headers.next());
    assert_eq!(headers.name().unwrap(), "A");
}

#[test]
fn absence_never_fails() {
    let req = ServerRequest::new("GET", Uri::new("/"), Vec::<(String, String)>::new());
    assert!(!req.has_header("X-Missing"));
    assert_eq!(req.header_line("X-Missing"), "");
    assert!(req.header("X-Missing").is_empty());
    assert_eq!(req.server_param("MISSING"), "");
    assert_eq!(req.cookie_param("missing"), "");
    assert_eq!(req.query_param("missing"), "");
    assert_eq!(req.body_param("missing"), "");
    assert!(req.uploaded_file("missing").is_none());
    assert_eq!(req.attribute("missing", "fallback"), "fallback");
    assert_eq!(req.attribute("missing", ""), "");
}

#[test]
fn gate_requires_both_post_and_media_type() {
    let cases = [
        ("GET", "multipart/form-data; boundary=b", false, false),
        ("PUT", "application/x-www-form-urlencoded", false, false),
        ("POST", "application/json", false, false),
        ("POST", "application/x-www-form-urlencoded", true, false),
        ("POST", "multipart/form-data; boundary=b", true, true),
    ];

    for (method, content_type, body_visible, files_visible) in cases {
        let mut req = ServerRequest::new(method, Uri::new("/"), Vec::<(String, String)>::new());
        req.set_header("Content-Type", content_type).unwrap();

        let mut params = ParamTable::new();
        params.insert("k".to_string(), "v".to_string());
        req.set_body_params(params);

        let mut files = HashMap::new();
        files.insert(
            "f".to_string(),
            UploadedFile::from_bytes("f.txt", "text/plain", b"data".to_vec()),
        );
        req.set_uploaded_files(files);

        assert_eq!(req.body_param("k") == "v", body_visible, "{method} {content_type}");
        assert_eq!(
            req.uploaded_file("f").is_some(),
            files_visible,
            "{method} {content_type}"
        );
    }
}

#[test]
fn multipart_upload_end_to_end() {
    let body = "--b0undary\r\n\
                Content-Disposition: form-data; name=\"title\"\r\n\r\n\
                Quarterly report\r\n\
                --b0undary\r\n\
                Content-Disposition: form-data; name=\"report\"; filename=\"q3.csv\"\r\n\
                Content-Type: text/csv\r\n\r\n\
                region,total\r\nnorth,12\r\n\
                --b0undary--\r\n";

    let mut stream = FileStream::temp().unwrap();
    stream.write_all(body.as_bytes()).unwrap();

    let mut req = form_post();
    req.set_header("Content-Type", "multipart/form-data; boundary=b0undary")
        .unwrap();
    req.set_body(Box::new(stream)).unwrap();
    req.parse_body().unwrap();

    assert_eq!(req.body_param("title"), "Quarterly report");

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("q3.csv");
    let report = req.uploaded_file_mut("report").unwrap();
    assert_eq!(report.client_filename(), "q3.csv");
    report.move_to(&target).unwrap();
    assert_eq!(
        std::fs::read_to_string(&target).unwrap(),
        "region,total\r\nnorth,12"
    );
}

#[test]
fn builder_style_values_stay_independent() {
    let base = Request::new("GET", Uri::new("/"))
        .with_header("Accept", "text/html")
        .unwrap();
    let mut headers = base.header_bag().clone();
    headers.set("Accept", "application/json").unwrap();

    assert_eq!(base.header_line("accept"), "text/html");
    assert_eq!(headers.line("accept"), "application/json");
}
