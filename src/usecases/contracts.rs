use super::{
    load_history::HistorySource, mark_read::ReceiptSink, send_message::MessageSender,
    toggle_reaction::ReactionSink, typing_ping::TypingSink,
};

/// Everything the controller needs from the server for one conversation.
/// Each port is defined next to its use case; this supertrait is the single
/// bound a `SyncController` takes.
pub trait ConversationGateway:
    HistorySource + MessageSender + ReceiptSink + ReactionSink + TypingSink
{
}

impl<T> ConversationGateway for T where
    T: HistorySource + MessageSender + ReceiptSink + ReactionSink + TypingSink
{
}
