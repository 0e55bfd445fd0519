use jobchat_core::*;
use serde_json::{self as json, json, Value};

fn parse(json_str: &str) -> Value {
    json::from_str(json_str).expect("valid json")
}

/*
    Goal: the send intent goes on the wire as { event: "send_message", data: {...} }
    with snake_case fields and a lowercase message_type, exactly what the backend reads.
*/
#[test]
fn send_message_event_shape() {
    let ev = ClientEvent::SendMessage(SendMessage {
        room_id: 7,
        message: "안녕하세요".to_string(),
        message_type: MessageKind::Text,
    });
    let v = parse(&json::to_string(&ev).expect("serialize"));

    assert_eq!(v["event"], "send_message");
    assert_eq!(v["data"]["room_id"], 7);
    assert_eq!(v["data"]["message"], "안녕하세요");
    assert_eq!(v["data"]["message_type"], "text");
}

/*
    Goal: join and read receipts only carry the room id.
*/
#[test]
fn join_and_read_receipt_shape() {
    let join = parse(&json::to_string(&ClientEvent::Join(RoomRef { room_id: 3 })).unwrap());
    assert_eq!(join, json!({ "event": "join", "data": { "room_id": 3 } }));

    let read = parse(&json::to_string(&ClientEvent::ReadMessages(RoomRef { room_id: 3 })).unwrap());
    assert_eq!(read, json!({ "event": "read_messages", "data": { "room_id": 3 } }));
}

/*
    Goal: a new_message broadcast as the backend emits it (no sender_name, extra is_read)
    decodes into a MessageRecord with every known field in place.
*/
#[test]
fn new_message_broadcast_decodes() {
    let raw = r#"{
        "event": "new_message",
        "data": {
            "id": 42, "room_id": 7, "message": "hello", "message_type": "text",
            "sender_id": 5, "created_at": "2025-03-14 15:04:05", "is_read": false
        }
    }"#;
    let ev: ServerEvent = json::from_str(raw).expect("deserialize");
    match ev {
        ServerEvent::NewMessage(m) => {
            assert_eq!(m.id, Some(42));
            assert_eq!(m.room_id, Some(7));
            assert_eq!(m.sender_id, 5);
            assert_eq!(m.sender_name, None);
            assert_eq!(m.message_type, MessageKind::Text);
            assert_eq!(m.is_read, Some(false));
        }
        other => panic!("expected NewMessage, got {other:?}"),
    }
}

/*
    Goal: system messages and missing bodies. A record without body or type
    still decodes: body empty, kind text.
*/
#[test]
fn message_record_defaults() {
    let sys: MessageRecord =
        json::from_str(r#"{"id":1,"sender_id":2,"message":"joined","message_type":"system","created_at":"x"}"#)
            .unwrap();
    assert!(sys.is_system());

    let bare: MessageRecord = json::from_str(r#"{"sender_id":2}"#).unwrap();
    assert_eq!(bare.id, None);
    assert_eq!(bare.message, "");
    assert_eq!(bare.message_type, MessageKind::Text);
}

/*
    Goal: messages_read and the badge events decode, and room_id() scopes them.
*/
#[test]
fn read_state_and_badges_decode() {
    let read: ServerEvent =
        json::from_str(r#"{"event":"messages_read","data":{"room_id":7,"reader_id":5}}"#).unwrap();
    assert_eq!(read.room_id(), Some(7));

    let total: ServerEvent = json::from_str(r#"{"event":"unread_total","data":{"count":4}}"#).unwrap();
    assert_eq!(total, ServerEvent::UnreadTotal(UnreadTotal { count: 4 }));
    assert_eq!(total.room_id(), None);

    let room: ServerEvent =
        json::from_str(r#"{"event":"room_unread_count","data":{"room_id":9,"count":0}}"#).unwrap();
    assert_eq!(room.room_id(), Some(9));
}

/*
    Goal: the backend error event maps onto the shared Error; details are optional.
*/
#[test]
fn server_error_event() {
    let ev: ServerEvent =
        json::from_str(r#"{"event":"error","data":{"code":"FORBIDDEN","message":"no permission for room"}}"#)
            .unwrap();
    match ev {
        ServerEvent::Error(e) => {
            assert_eq!(e.code, "FORBIDDEN");
            assert!(e.details.is_none());
            assert_eq!(e.to_string(), "FORBIDDEN: no permission for room");
        }
        other => panic!("expected Error, got {other:?}"),
    }
}

/*
    Goal: an unknown event name is a decode error, so the transport can skip it.
*/
#[test]
fn unknown_event_is_rejected() {
    let res = json::from_str::<ServerEvent>(r#"{"event":"typing","data":{"room_id":1}}"#);
    assert!(res.is_err());
}

/*
    Goal: REST bodies. Optional fields missing on failure, extra backend fields ignored.
*/
#[test]
fn rest_responses_tolerate_partial_bodies() {
    let sent: SendMessageResponse = json::from_str(
        r#"{"success":true,"message":"ok","message_data":{"id":9,"message":"hi","sender_id":1,
            "sender_name":"민수","created_at":"2025-03-14 15:04:05","message_type":"text"}}"#,
    )
    .unwrap();
    assert_eq!(sent.message_data.as_ref().and_then(|m| m.id), Some(9));
    assert_eq!(sent.message_data.unwrap().sender_name.as_deref(), Some("민수"));

    let failed: SendMessageResponse = json::from_str(r#"{"success":false,"message":"empty"}"#).unwrap();
    assert!(!failed.success);
    assert!(failed.message_data.is_none());

    let page: ListMessagesResponse = json::from_str(r#"{"success":true,"messages":[],"has_more":true}"#).unwrap();
    assert!(page.has_more);

    let bm: BookmarkResponse =
        json::from_str(r#"{"success":true,"is_bookmarked":false,"bookmark_count":3,"message":"찜을 취소했습니다."}"#)
            .unwrap();
    assert!(!bm.is_bookmarked);
    assert_eq!(bm.bookmark_count, Some(3));

    let applied: ApplyResponse = json::from_str(r#"{"success":true,"chat_room_id":12}"#).unwrap();
    assert_eq!(applied.chat_room_id, Some(12));

    let deleted: ActionResponse = json::from_str(r#"{"success":false}"#).unwrap();
    assert_eq!(deleted.message, None);
}

/*
    Goal: query string and request body for the REST calls.
*/
#[test]
fn request_bodies_and_paths() {
    let q = ListMessagesQuery::default();
    assert_eq!((q.page, q.per_page), (1, 10));

    let body = parse(
        &json::to_string(&SendMessageRequest { message: "hi".into(), message_type: MessageKind::Text }).unwrap(),
    );
    assert_eq!(body, json!({ "message": "hi", "message_type": "text" }));

    use jobchat_core::protocol::http::paths;
    assert_eq!(paths::send_message(7), "/chat/7/send");
    assert_eq!(paths::messages(7), "/chat/7/messages");
    assert_eq!(paths::leave_room(7), "/chat/7/leave");
    assert_eq!(paths::apply(3), "/jobs/3/apply");
    assert_eq!(paths::bookmark(3), "/jobs/3/bookmark");
    assert_eq!(paths::job(3), "/jobs/3");
}
