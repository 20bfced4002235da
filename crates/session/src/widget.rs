use std::sync::Arc;

use chatbot_model::{Message, QuickReplyOption};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::{Conversation, SessionConfig, SessionState};

/// A widget session: a seeded conversation plus the reply timer.
///
/// User turns are appended as soon as they are submitted; the bot reply
/// lands after `reply_delay` on a spawned single-shot task. While that task
/// is pending further submissions are ignored. Closing (or dropping) the
/// session aborts the timer and discards the transcript.
pub struct ChatSession {
    conversation: Arc<Mutex<Conversation>>,
    config: SessionConfig,
    reply_task: Option<JoinHandle<()>>,
}

impl ChatSession {
    /// Open a session with the greeting already in place.
    pub fn open(config: SessionConfig) -> Self {
        let mut conversation = Conversation::new();
        conversation.seed();

        Self {
            conversation: Arc::new(Mutex::new(conversation)),
            config,
            reply_task: None,
        }
    }

    /// Submit typed text. Returns `false` when the submission was ignored.
    pub async fn submit_user_text(&mut self, text: &str) -> bool {
        let staged = self.conversation.lock().await.submit_user_text(text);
        match staged {
            Ok(intent) => {
                tracing::debug!(%intent, "Reply scheduled");
                self.schedule_reply();
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, "Submission ignored");
                false
            }
        }
    }

    /// Select a quick-reply option. Returns `false` when ignored.
    pub async fn select_quick_reply(&mut self, option: &QuickReplyOption) -> bool {
        let staged = self.conversation.lock().await.select_quick_reply(option);
        match staged {
            Ok(()) => {
                tracing::debug!(option = %option.id, "Reply scheduled");
                self.schedule_reply();
                true
            }
            Err(e) => {
                tracing::debug!(error = %e, option = %option.id, "Quick reply ignored");
                false
            }
        }
    }

    fn schedule_reply(&mut self) {
        let conversation = Arc::clone(&self.conversation);
        let delay = self.config.reply_delay;

        self.reply_task = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if conversation.lock().await.deliver_reply().is_none() {
                tracing::warn!("Reply timer fired with nothing staged");
            }
        }));
    }

    /// Wait for the pending reply, if any, to land.
    pub async fn settle(&mut self) {
        let Some(task) = self.reply_task.take() else {
            return;
        };
        if let Err(e) = task.await {
            if !e.is_cancelled() {
                tracing::warn!(error = %e, "Reply task failed");
            }
        }
    }

    /// Snapshot of the transcript.
    pub async fn transcript(&self) -> Vec<Message> {
        self.conversation.lock().await.transcript().to_vec()
    }

    pub async fn should_show_quick_replies(&self) -> bool {
        self.conversation.lock().await.should_show_quick_replies()
    }

    pub async fn is_awaiting_reply(&self) -> bool {
        self.conversation.lock().await.is_awaiting_reply()
    }

    pub async fn state(&self) -> SessionState {
        self.conversation.lock().await.state()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Close the widget, cancelling any pending reply.
    pub fn close(self) {
        tracing::debug!(pending = self.reply_task.is_some(), "Session closed");
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        if let Some(task) = self.reply_task.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chatbot_model::Speaker;
    use chatbot_responses::quick_replies;
    use pretty_assertions::assert_eq;

    fn instant() -> SessionConfig {
        SessionConfig::default().with_reply_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_open_seeds_greeting() {
        let session = ChatSession::open(instant());
        assert_eq!(session.transcript().await.len(), 1);
        assert!(session.should_show_quick_replies().await);
        assert_eq!(session.state().await, SessionState::Seeded);
    }

    #[tokio::test]
    async fn test_submit_then_settle() {
        let mut session = ChatSession::open(instant());
        assert!(session.submit_user_text("와이즈온 도입 절차가 궁금해요").await);
        session.settle().await;

        let transcript = session.transcript().await;
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].speaker, Speaker::User);
        assert_eq!(transcript[2].speaker, Speaker::Bot);
        assert!(!session.should_show_quick_replies().await);
        assert_eq!(session.state().await, SessionState::Exchanged);
    }

    #[tokio::test]
    async fn test_empty_submission_ignored() {
        let mut session = ChatSession::open(instant());
        assert!(!session.submit_user_text("   ").await);
        session.settle().await;
        assert_eq!(session.transcript().await.len(), 1);
    }

    #[tokio::test]
    async fn test_quick_reply_after_delay() {
        let mut session = ChatSession::open(
            SessionConfig::default().with_reply_delay(Duration::from_millis(20)),
        );
        let option = &quick_replies()[2];
        assert!(session.select_quick_reply(option).await);
        session.settle().await;

        let transcript = session.transcript().await;
        assert_eq!(transcript.len(), 3);
        assert_eq!(transcript[1].text, option.label);
        assert_eq!(transcript[2], Message::from_response(&option.response));
    }

    #[tokio::test]
    async fn test_second_submission_ignored_while_pending() {
        let mut session = ChatSession::open(
            SessionConfig::default().with_reply_delay(Duration::from_millis(50)),
        );
        assert!(session.submit_user_text("리서치 비용").await);
        assert!(!session.submit_user_text("교육 일정").await);
        assert!(!session.select_quick_reply(&quick_replies()[0]).await);
        assert!(session.is_awaiting_reply().await);
        assert_eq!(session.transcript().await.len(), 2);

        session.settle().await;
        assert_eq!(session.transcript().await.len(), 3);
        assert!(session.submit_user_text("교육 일정").await);
        session.settle().await;
        assert_eq!(session.transcript().await.len(), 5);
    }

    #[tokio::test]
    async fn test_close_cancels_pending_reply() {
        let mut session = ChatSession::open(
            SessionConfig::default().with_reply_delay(Duration::from_millis(20)),
        );
        let conversation = Arc::clone(&session.conversation);
        assert!(session.submit_user_text("연락처").await);
        assert_eq!(session.transcript().await.len(), 2);
        session.close();

        tokio::time::sleep(Duration::from_millis(100)).await;
        let conversation = conversation.lock().await;
        assert_eq!(conversation.len(), 2);
        assert!(conversation.is_awaiting_reply());
    }
}
