use super::*;

#[test]
fn http_status_maps_to_error_code() {
    assert_eq!(ErrorCode::from_http_status(401), ErrorCode::Unauthorized);
    assert_eq!(ErrorCode::from_http_status(403), ErrorCode::Unauthorized);
    assert_eq!(ErrorCode::from_http_status(404), ErrorCode::NotFound);
    assert_eq!(ErrorCode::from_http_status(422), ErrorCode::Validation);
    assert_eq!(ErrorCode::from_http_status(503), ErrorCode::Unavailable);
    assert_eq!(ErrorCode::from_http_status(500), ErrorCode::Internal);
}

#[test]
fn exception_display_names_code_and_message() {
    let err = ApiException::new(ErrorCode::Validation, "curriculum is empty");
    assert_eq!(err.to_string(), "Validation: curriculum is empty");
}
