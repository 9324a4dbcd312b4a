use super::*;
use uuid::Uuid;

#[test]
fn committed_notice_mentions_destination_and_server_message() {
    let receipt = SinkReceipt {
        submission_id: Uuid::new_v4(),
        destination: "http://lectures.local/start".into(),
        message: Some("lecture queued".into()),
    };

    let notice = Notice::committed(&receipt);
    assert_eq!(notice.level(), NoticeLevel::Info);
    assert_eq!(notice.category(), NoticeCategory::Committed);
    assert!(notice.message().contains("http://lectures.local/start"));
    assert!(notice.message().contains("lecture queued"));
}

#[test]
fn connect_and_timeout_failures_are_transport_whatever_the_text() {
    for kind in [TransportKind::Connect, TransportKind::Timeout] {
        let notice = Notice::from_sink_error(&SinkError::transport(
            kind,
            "error sending request for url (http://127.0.0.1:9/submit)",
        ));
        assert_eq!(notice.category(), NoticeCategory::Transport);
        assert!(notice.is_error());
    }
}

#[test]
fn other_transport_failures_fall_back_to_message() {
    let notice = Notice::from_sink_error(&SinkError::transport(
        TransportKind::Other,
        "error sending request: operation timed out",
    ));
    assert_eq!(notice.category(), NoticeCategory::Transport);

    let notice =
        Notice::from_sink_error(&SinkError::transport(TransportKind::Other, "builder error"));
    assert_eq!(notice.category(), NoticeCategory::Unknown);
}

#[test]
fn unavailable_status_counts_as_transport() {
    let notice = Notice::from_sink_error(&SinkError::Rejected {
        code: ErrorCode::Unavailable,
        status: Some(503),
        message: "maintenance".into(),
    });
    assert_eq!(notice.category(), NoticeCategory::Transport);
}

#[test]
fn io_failure_is_storage() {
    let err = SinkError::Io(std::io::Error::new(
        std::io::ErrorKind::PermissionDenied,
        "read-only",
    ));
    let notice = Notice::from_sink_error(&err);
    assert_eq!(notice.category(), NoticeCategory::Storage);
    assert!(notice.message().contains("read-only"));
}
