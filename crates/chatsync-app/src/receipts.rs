//! Sequential read-receipt queue.
//!
//! Every fetched message addressed to the local user that is not yet `read`
//! gets one status update. Updates go out one at a time: the next is released
//! only when the previous completes, whatever its outcome.

use std::collections::VecDeque;

use chatsync_proto::{Message, MessageId, Username};

use crate::ApiRequest;

/// Pending and in-flight read receipts.
#[derive(Debug, Clone, Default)]
pub struct ReceiptQueue {
    pending: VecDeque<MessageId>,
    in_flight: Option<MessageId>,
}

impl ReceiptQueue {
    /// Queue a receipt for every message in `messages` that needs one.
    ///
    /// Ids already queued or in flight are skipped. Returns how many were
    /// added.
    pub fn enqueue_unread(&mut self, messages: &[Message], identity: &Username) -> usize {
        let mut added = 0;
        for message in messages.iter().filter(|m| m.needs_read_receipt(identity)) {
            if self.in_flight == Some(message.id) || self.pending.contains(&message.id) {
                continue;
            }
            self.pending.push_back(message.id);
            added += 1;
        }
        added
    }

    /// Next request to issue, if nothing is in flight.
    pub fn next_request(&mut self) -> Option<ApiRequest> {
        if self.in_flight.is_some() {
            return None;
        }
        let message_id = self.pending.pop_front()?;
        self.in_flight = Some(message_id);
        Some(ApiRequest::MarkRead { message_id })
    }

    /// Record completion of the receipt for `id`.
    ///
    /// Completions for anything other than the in-flight id are ignored.
    pub fn complete(&mut self, id: MessageId) {
        if self.in_flight == Some(id) {
            self.in_flight = None;
        }
    }

    /// Receipt currently awaiting completion.
    pub fn in_flight(&self) -> Option<MessageId> {
        self.in_flight
    }

    /// Receipts waiting behind the in-flight one.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
