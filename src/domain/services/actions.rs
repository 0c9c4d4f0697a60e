#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task;

use crate::domain::models::Action;
use crate::domain::models::Author;
use crate::domain::models::ConversationId;
use crate::domain::models::Event;
use crate::domain::models::Message;
use crate::domain::models::ServiceHandle;
use crate::domain::models::UserPrompt;

pub fn help_text() -> String {
    let text = r#"
HOTKEYS:
- Enter - Send the typed message to the active conversation.
- CTRL+N - Start a new conversation.
- CTRL+B - Show or hide the conversations sidebar.
- ALT+Up / ALT+Down - Move the sidebar selection.
- CTRL+O - Open the selected conversation.
- Up arrow / Down arrow - Scroll the messages pane.
- CTRL+U / CTRL+D - Scroll the messages pane by half a page.
- CTRL+C - Exit.
        "#;

    return text.trim().to_string();
}

/// Best-effort sidebar refresh. A failure leaves the cached list stale but
/// valid, so it is logged and otherwise swallowed.
async fn refresh_conversations(
    service: &ServiceHandle,
    tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    match service.list_conversations().await {
        Ok(conversations) => {
            tx.send(Event::ConversationList(conversations))?;
        }
        Err(err) => {
            tracing::warn!(err = ?err, "conversation list refresh failed");
        }
    }

    return Ok(());
}

async fn create_conversation(
    service: &ServiceHandle,
    tx: &mpsc::UnboundedSender<Event>,
) -> Result<()> {
    match service.create_conversation().await {
        Ok(conversation) => {
            tracing::debug!(conversation = %conversation, "conversation created");
            tx.send(Event::ConversationCreated(conversation))?;
            refresh_conversations(service, tx).await?;
        }
        Err(err) => {
            tracing::error!(err = ?err, "conversation create failed");
            tx.send(Event::ConversationCreateFailed(err.to_string()))?;
        }
    }

    return Ok(());
}

async fn open_conversation(
    service: &ServiceHandle,
    tx: &mpsc::UnboundedSender<Event>,
    conversation: ConversationId,
) -> Result<()> {
    match service.fetch_history(&conversation).await {
        Ok(history) => {
            tx.send(Event::HistoryLoaded(conversation, history))?;
        }
        Err(err) => {
            tracing::error!(err = ?err, conversation = %conversation, "history fetch failed");
            tx.send(Event::HistoryLoadFailed(conversation, err.to_string()))?;
        }
    }

    return Ok(());
}

async fn send_prompt(
    service: &ServiceHandle,
    tx: &mpsc::UnboundedSender<Event>,
    prompt: UserPrompt,
) -> Result<()> {
    match service.send_message(&prompt).await {
        Ok(reply) => {
            tx.send(Event::PromptReply(
                prompt.conversation.clone(),
                Message::new(Author::Assistant, &reply),
            ))?;
            refresh_conversations(service, tx).await?;
        }
        Err(err) => {
            tracing::error!(err = ?err, conversation = %prompt.conversation, "send failed");
            tx.send(Event::PromptFailed(prompt.conversation))?;
        }
    }

    return Ok(());
}

pub struct ActionsService {}

impl ActionsService {
    /// Drives every network request. Each action is dispatched onto its own
    /// task holding a clone of the service handle, so requests overlap freely
    /// and each outcome comes back as an event whenever its call completes.
    /// The session guards on the receiving side decide whether a late result
    /// still matters.
    pub async fn start(
        service: ServiceHandle,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        loop {
            let action = rx.recv().await;
            if action.is_none() {
                return Ok(());
            }

            let worker_tx = tx.clone();
            let worker_service = service.clone();
            match action.unwrap() {
                Action::RefreshConversations() => {
                    task::spawn(async move {
                        if let Err(err) = refresh_conversations(&worker_service, &worker_tx).await {
                            tracing::debug!(err = ?err, "event channel closed during refresh");
                        }
                    });
                }
                Action::CreateConversation() => {
                    task::spawn(async move {
                        if let Err(err) = create_conversation(&worker_service, &worker_tx).await {
                            tracing::debug!(err = ?err, "event channel closed during create");
                        }
                    });
                }
                Action::OpenConversation(conversation) => {
                    task::spawn(async move {
                        if let Err(err) =
                            open_conversation(&worker_service, &worker_tx, conversation).await
                        {
                            tracing::debug!(err = ?err, "event channel closed during open");
                        }
                    });
                }
                Action::SendPrompt(prompt) => {
                    task::spawn(async move {
                        if let Err(err) = send_prompt(&worker_service, &worker_tx, prompt).await {
                            tracing::debug!(err = ?err, "event channel closed during send");
                        }
                    });
                }
            }
        }
    }
}
