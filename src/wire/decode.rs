//! Push payload decoding.
//!
//! Every transport shape is normalized into [`PushEvent`] here, including
//! the legacy receipt envelope; handlers downstream never sniff payloads.

use chrono::DateTime;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{
    events::PushEvent,
    message::{Attachment, Message, MessageKind},
    reactions::ReactionAggregate,
    receipts::ReceiptUpdate,
};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("unknown push event {0:?}")]
    UnknownEvent(String),
    #[error("malformed {event} payload: {source}")]
    MalformedPayload {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid timestamp {value:?} in {event} payload")]
    InvalidTimestamp { event: &'static str, value: String },
}

/// Decodes one raw push frame into the normalized event union.
pub fn decode_event(name: &str, payload: &Value) -> Result<PushEvent, DecodeError> {
    match name {
        "message:new" => {
            let dto: MessageDto = parse("message:new", payload)?;
            Ok(PushEvent::MessageNew(dto.into_message("message:new")?))
        }
        "typing" => {
            let dto: TypingDto = parse("typing", payload)?;
            Ok(PushEvent::Typing {
                user_id: dto.user_id,
                display_name: dto.name,
            })
        }
        "receipt:update" => {
            let dto: ReceiptEnvelopeDto = parse("receipt:update", payload)?;
            Ok(PushEvent::ReceiptUpdate {
                updates: dto.into_updates("receipt:update")?,
            })
        }
        "reaction:update" => {
            let dto: ReactionUpdateDto = parse("reaction:update", payload)?;
            Ok(PushEvent::ReactionUpdate {
                message_id: dto.message_id,
                reactions: dto
                    .reactions
                    .into_iter()
                    .map(|reaction| ReactionAggregate {
                        emoji: reaction.emoji,
                        reactor_ids: reaction.user_ids.into_iter().collect(),
                    })
                    .collect(),
            })
        }
        "conversation:read" => {
            let dto: ConversationReadDto = parse("conversation:read", payload)?;
            let last_read_at_ms = parse_timestamp("conversation:read", &dto.last_read_at)?;
            Ok(PushEvent::ConversationRead {
                user_id: dto.user_id,
                last_read_at_ms,
            })
        }
        "subscription:succeeded" => {
            let dto: RosterDto = parse("subscription:succeeded", payload)?;
            Ok(PushEvent::SubscriptionSucceeded {
                member_ids: dto.member_ids,
            })
        }
        "member:added" => {
            let dto: MemberDto = parse("member:added", payload)?;
            Ok(PushEvent::MemberAdded {
                user_id: dto.user_id,
            })
        }
        "member:removed" => {
            let dto: MemberDto = parse("member:removed", payload)?;
            Ok(PushEvent::MemberRemoved {
                user_id: dto.user_id,
            })
        }
        other => Err(DecodeError::UnknownEvent(other.to_owned())),
    }
}

fn parse<T: for<'de> Deserialize<'de>>(
    event: &'static str,
    payload: &Value,
) -> Result<T, DecodeError> {
    serde_json::from_value(payload.clone())
        .map_err(|source| DecodeError::MalformedPayload { event, source })
}

fn parse_timestamp(event: &'static str, value: &str) -> Result<i64, DecodeError> {
    DateTime::parse_from_rfc3339(value)
        .map(|timestamp| timestamp.timestamp_millis())
        .map_err(|_| DecodeError::InvalidTimestamp {
            event,
            value: value.to_owned(),
        })
}

fn parse_optional_timestamp(
    event: &'static str,
    value: Option<&str>,
) -> Result<Option<i64>, DecodeError> {
    value
        .map(|value| parse_timestamp(event, value))
        .transpose()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessageDto {
    id: String,
    conversation_id: String,
    sender_id: String,
    #[serde(default)]
    content: String,
    created_at: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    attachments: Vec<AttachmentDto>,
}

impl MessageDto {
    fn into_message(self, event: &'static str) -> Result<Message, DecodeError> {
        let created_at_ms = parse_timestamp(event, &self.created_at)?;
        Ok(Message {
            id: self.id,
            conversation_id: self.conversation_id,
            sender_id: self.sender_id,
            content: self.content,
            created_at_ms,
            kind: self
                .kind
                .as_deref()
                .map(MessageKind::from_label)
                .unwrap_or_default(),
            attachments: self
                .attachments
                .into_iter()
                .map(|attachment| Attachment {
                    file_name: attachment.file_name,
                    url: attachment.url,
                    content_type: attachment.content_type,
                })
                .collect(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentDto {
    file_name: String,
    url: String,
    #[serde(default)]
    content_type: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypingDto {
    user_id: String,
    #[serde(default)]
    name: Option<String>,
}

/// Both receipt envelope generations. The legacy shape scopes a batch of
/// per-user receipts to one message id.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ReceiptEnvelopeDto {
    Updates {
        updates: Vec<ReceiptUpdateDto>,
    },
    Legacy {
        #[serde(rename = "messageId")]
        message_id: String,
        receipts: Vec<LegacyReceiptDto>,
    },
}

impl ReceiptEnvelopeDto {
    fn into_updates(self, event: &'static str) -> Result<Vec<ReceiptUpdate>, DecodeError> {
        match self {
            ReceiptEnvelopeDto::Updates { updates } => updates
                .into_iter()
                .map(|update| {
                    Ok(ReceiptUpdate {
                        message_id: update.message_id,
                        user_id: update.user_id,
                        delivered_at_ms: parse_optional_timestamp(
                            event,
                            update.delivered_at.as_deref(),
                        )?,
                        read_at_ms: parse_optional_timestamp(event, update.read_at.as_deref())?,
                    })
                })
                .collect(),
            ReceiptEnvelopeDto::Legacy {
                message_id,
                receipts,
            } => receipts
                .into_iter()
                .map(|receipt| {
                    Ok(ReceiptUpdate {
                        message_id: message_id.clone(),
                        user_id: receipt.user_id,
                        delivered_at_ms: parse_optional_timestamp(
                            event,
                            receipt.delivered_at.as_deref(),
                        )?,
                        read_at_ms: parse_optional_timestamp(event, receipt.read_at.as_deref())?,
                    })
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReceiptUpdateDto {
    message_id: String,
    user_id: String,
    #[serde(default)]
    delivered_at: Option<String>,
    #[serde(default)]
    read_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyReceiptDto {
    user_id: String,
    #[serde(default)]
    delivered_at: Option<String>,
    #[serde(default)]
    read_at: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReactionUpdateDto {
    message_id: String,
    reactions: Vec<ReactionDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReactionDto {
    emoji: String,
    user_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConversationReadDto {
    user_id: String,
    last_read_at: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RosterDto {
    member_ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberDto {
    user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_a_new_message() {
        let payload = json!({
            "id": "42",
            "conversationId": "c1",
            "senderId": "u2",
            "content": "hello",
            "createdAt": "2026-08-07T12:00:00Z",
            "type": "text",
            "attachments": [
                {"fileName": "a.png", "url": "https://files/a.png", "contentType": "image/png"}
            ]
        });

        let event = decode_event("message:new", &payload).expect("decode must succeed");

        let PushEvent::MessageNew(message) = event else {
            panic!("expected message:new");
        };
        assert_eq!(message.id, "42");
        assert_eq!(message.kind, MessageKind::Text);
        assert_eq!(message.attachments.len(), 1);
        assert!(message.created_at_ms > 0);
    }

    #[test]
    fn message_without_type_defaults_to_text() {
        let payload = json!({
            "id": "42",
            "conversationId": "c1",
            "senderId": "u2",
            "content": "hello",
            "createdAt": "2026-08-07T12:00:00Z"
        });

        let event = decode_event("message:new", &payload).expect("decode must succeed");

        let PushEvent::MessageNew(message) = event else {
            panic!("expected message:new");
        };
        assert_eq!(message.kind, MessageKind::Text);
        assert!(message.attachments.is_empty());
    }

    #[test]
    fn decodes_typing_with_and_without_name() {
        let with_name = decode_event("typing", &json!({"userId": "u2", "name": "Bea"}))
            .expect("decode must succeed");
        assert_eq!(
            with_name,
            PushEvent::Typing {
                user_id: "u2".to_owned(),
                display_name: Some("Bea".to_owned()),
            }
        );

        let without_name =
            decode_event("typing", &json!({"userId": "u2"})).expect("decode must succeed");
        assert_eq!(
            without_name,
            PushEvent::Typing {
                user_id: "u2".to_owned(),
                display_name: None,
            }
        );
    }

    #[test]
    fn decodes_modern_receipt_envelope() {
        let payload = json!({
            "updates": [
                {"messageId": "42", "userId": "u2", "deliveredAt": "2026-08-07T12:00:00Z"},
                {"messageId": "42", "userId": "u3", "readAt": "2026-08-07T12:01:00Z"}
            ]
        });

        let event = decode_event("receipt:update", &payload).expect("decode must succeed");

        let PushEvent::ReceiptUpdate { updates } = event else {
            panic!("expected receipt:update");
        };
        assert_eq!(updates.len(), 2);
        assert!(updates[0].delivered_at_ms.is_some());
        assert!(updates[0].read_at_ms.is_none());
        assert!(updates[1].read_at_ms.is_some());
    }

    #[test]
    fn legacy_receipt_envelope_normalizes_to_the_same_updates() {
        let payload = json!({
            "messageId": "42",
            "receipts": [
                {"userId": "u2", "deliveredAt": "2026-08-07T12:00:00Z"},
                {"userId": "u3", "readAt": "2026-08-07T12:01:00Z"}
            ]
        });

        let event = decode_event("receipt:update", &payload).expect("decode must succeed");

        let PushEvent::ReceiptUpdate { updates } = event else {
            panic!("expected receipt:update");
        };
        assert_eq!(updates.len(), 2);
        assert_eq!(updates[0].message_id, "42");
        assert_eq!(updates[1].message_id, "42");
        assert_eq!(updates[1].user_id, "u3");
    }

    #[test]
    fn decodes_reaction_update_with_reactor_sets() {
        let payload = json!({
            "messageId": "42",
            "reactions": [
                {"emoji": "👍", "count": 2, "userIds": ["u2", "u3"]}
            ]
        });

        let event = decode_event("reaction:update", &payload).expect("decode must succeed");

        let PushEvent::ReactionUpdate {
            message_id,
            reactions,
        } = event
        else {
            panic!("expected reaction:update");
        };
        assert_eq!(message_id, "42");
        assert_eq!(reactions[0].count(), 2);
        assert!(reactions[0].reactor_ids.contains("u2"));
    }

    #[test]
    fn decodes_conversation_read_pointer() {
        let payload = json!({"userId": "u2", "lastReadAt": "2026-08-07T12:00:00Z"});

        let event = decode_event("conversation:read", &payload).expect("decode must succeed");

        let PushEvent::ConversationRead {
            user_id,
            last_read_at_ms,
        } = event
        else {
            panic!("expected conversation:read");
        };
        assert_eq!(user_id, "u2");
        assert!(last_read_at_ms > 0);
    }

    #[test]
    fn decodes_membership_events() {
        let roster = decode_event(
            "subscription:succeeded",
            &json!({"memberIds": ["u1", "u2"]}),
        )
        .expect("decode must succeed");
        assert_eq!(
            roster,
            PushEvent::SubscriptionSucceeded {
                member_ids: vec!["u1".to_owned(), "u2".to_owned()],
            }
        );

        let added =
            decode_event("member:added", &json!({"userId": "u3"})).expect("decode must succeed");
        assert_eq!(
            added,
            PushEvent::MemberAdded {
                user_id: "u3".to_owned(),
            }
        );
    }

    #[test]
    fn unknown_event_name_is_rejected() {
        let error = decode_event("message:edited", &json!({})).expect_err("decode must fail");

        assert!(matches!(error, DecodeError::UnknownEvent(name) if name == "message:edited"));
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let error =
            decode_event("typing", &json!({"name": "Bea"})).expect_err("decode must fail");

        assert!(matches!(error, DecodeError::MalformedPayload { .. }));
    }

    #[test]
    fn invalid_timestamp_is_rejected() {
        let payload = json!({"userId": "u2", "lastReadAt": "yesterday"});

        let error = decode_event("conversation:read", &payload).expect_err("decode must fail");

        assert!(matches!(error, DecodeError::InvalidTimestamp { .. }));
    }
}
