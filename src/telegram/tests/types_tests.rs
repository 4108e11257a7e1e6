//! Decoding of Bot API payloads.

use crate::chat::InboundUpdate;
use crate::identity::domain::{ConversationHandle, ExternalChatId};
use crate::telegram::{ApiResponse, Update};
use rstest::rstest;

const UPDATES: &str = r#"{
    "ok": true,
    "result": [
        {
            "update_id": 100,
            "message": {
                "message_id": 1,
                "date": 1760000000,
                "from": {"id": 555, "is_bot": false, "first_name": "Ann", "username": "ann"},
                "chat": {"id": 9001, "type": "private"},
                "text": "/start"
            }
        },
        {
            "update_id": 101,
            "message": {
                "message_id": 2,
                "date": 1760000001,
                "from": {"id": 555, "is_bot": false, "first_name": "Ann"},
                "chat": {"id": 9001, "type": "private"},
                "photo": []
            }
        },
        {
            "update_id": 102,
            "edited_message": {"message_id": 1}
        }
    ]
}"#;

#[rstest]
fn updates_map_to_inbound_messages() {
    let response: ApiResponse<Vec<Update>> =
        serde_json::from_str(UPDATES).expect("payload should decode");
    assert!(response.ok);

    let inbound: Vec<InboundUpdate> = response
        .result
        .expect("result present")
        .into_iter()
        .map(InboundUpdate::from)
        .collect();

    assert_eq!(inbound.len(), 3);
    let first = inbound
        .first()
        .and_then(|update| update.message.as_ref())
        .expect("text message");
    assert_eq!(first.sender, ExternalChatId::new(555));
    assert_eq!(first.conversation, ConversationHandle::from_chat_id(9001));
    assert_eq!(first.text, "/start");
    let ids: Vec<i64> = inbound.iter().map(|update| update.update_id).collect();
    assert_eq!(ids, vec![100, 101, 102]);
    assert!(inbound.iter().skip(1).all(|update| update.message.is_none()));
}

#[rstest]
fn error_envelope_carries_description() {
    let response: ApiResponse<serde_json::Value> = serde_json::from_str(
        r#"{"ok": false, "error_code": 403, "description": "Forbidden: bot was blocked by the user"}"#,
    )
    .expect("payload should decode");

    assert!(!response.ok);
    assert_eq!(response.error_code, Some(403));
    assert_eq!(
        response.description.as_deref(),
        Some("Forbidden: bot was blocked by the user")
    );
    assert!(response.result.is_none());
}
