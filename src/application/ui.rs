use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableMouseCapture;
use crossterm::event::EnableMouseCapture;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::List;
use ratatui::widgets::ListItem;
use ratatui::widgets::ListState;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::domain::models::Action;
use crate::domain::models::Author;
use crate::domain::models::Event;
use crate::domain::models::MessageType;
use crate::domain::models::TextArea;
use crate::domain::services::events::EventsService;
use crate::domain::services::SessionState;

fn message_lines(session: &SessionState, width: u16) -> Vec<Line<'static>> {
    let wrap_width = usize::from(width.saturating_sub(2).max(1));
    let mut lines: Vec<Line<'static>> = vec![];

    for message in &session.messages {
        let mut author_style = Style::default().add_modifier(Modifier::BOLD);
        let mut text_style = Style::default();
        match message.author {
            Author::User => author_style = author_style.fg(Color::Cyan),
            Author::Assistant => author_style = author_style.fg(Color::Green),
        }
        if message.message_type() == MessageType::Error {
            text_style = text_style.fg(Color::Red);
        }

        lines.push(Line::from(Span::styled(
            format!("{}:", message.author.to_string()),
            author_style,
        )));
        for text_line in message.as_string_lines(wrap_width) {
            lines.push(Line::from(Span::styled(text_line, text_style)));
        }
        lines.push(Line::from(""));
    }

    return lines;
}

fn messages_title(session: &SessionState) -> Line<'static> {
    if let Some(notice) = &session.notice {
        return Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(Color::Red),
        ));
    }
    if session.waiting_for_reply() {
        return Line::from("Lyra is thinking...");
    }
    if session.active_conversation.is_none() {
        return Line::from("Lyra, CTRL+N starts a new conversation");
    }

    return Line::from("Lyra");
}

fn render_sidebar<B: Backend>(frame: &mut Frame<B>, rect: Rect, session: &SessionState) {
    let items = session
        .conversations
        .iter()
        .enumerate()
        .map(|(idx, summary)| {
            return ListItem::new(summary.label(idx));
        })
        .collect::<Vec<ListItem>>();

    let mut state = ListState::default();
    if !session.conversations.is_empty() {
        state.select(Some(session.selected_conversation));
    }

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Conversations"))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    frame.render_stateful_widget(list, rect, &mut state);
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    session: &mut SessionState,
    tx: mpsc::UnboundedSender<Action>,
    events: &mut EventsService,
) -> Result<()> {
    let mut textarea = TextArea::default();

    loop {
        terminal.draw(|frame| {
            let frame_rect = frame.size();
            session.set_rect(frame_rect);

            let mut main_rect = frame_rect;
            if session.sidebar_visible {
                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints(vec![Constraint::Max(30), Constraint::Min(1)])
                    .split(frame_rect);

                render_sidebar(frame, columns[0], session);
                main_rect = columns[1];
            }

            let layout = Layout::default()
                .direction(Direction::Vertical)
                .constraints(vec![Constraint::Min(1), Constraint::Max(4)])
                .split(main_rect);

            let lines = message_lines(session, layout[0].width);
            session.sync_scroll(lines.len() as u16, layout[0].height);

            let messages = Paragraph::new(Text::from(lines))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(messages_title(session)),
                )
                .scroll((session.scroll.position, 0));
            frame.render_widget(messages, layout[0]);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                layout[0].inner(&Margin {
                    vertical: 1,
                    horizontal: 0,
                }),
                &mut session.scroll.scrollbar_state,
            );

            frame.render_widget(textarea.widget(), layout[1]);
        })?;

        match events.next().await? {
            Event::ConversationList(conversations) => {
                session.replace_conversations(conversations);
            }
            Event::ConversationCreated(conversation) => {
                session.apply_created(conversation);
            }
            Event::ConversationCreateFailed(err) => {
                session.apply_create_failure(&err);
            }
            Event::HistoryLoaded(conversation, history) => {
                session.apply_history(&conversation, history);
            }
            Event::HistoryLoadFailed(conversation, err) => {
                session.apply_open_failure(&conversation, &err);
            }
            Event::PromptReply(conversation, message) => {
                session.apply_reply(&conversation, message);
            }
            Event::PromptFailed(conversation) => {
                session.apply_reply_failure(&conversation);
            }
            Event::KeyboardCTRLC() => break,
            Event::KeyboardCTRLB() => {
                session.toggle_sidebar();
            }
            Event::KeyboardCTRLN() => {
                session.request_create();
                tx.send(Action::CreateConversation())?;
            }
            Event::KeyboardCTRLO() => {
                if let Some(summary) = session.selected_summary() {
                    let conversation = summary.id.clone();
                    session.request_open(conversation.clone());
                    tx.send(Action::OpenConversation(conversation))?;
                }
            }
            Event::SidebarSelectUp() => {
                session.select_previous_conversation();
            }
            Event::SidebarSelectDown() => {
                session.select_next_conversation();
            }
            Event::KeyboardEnter() => {
                session.pending_input = textarea.lines().join("\n");
                if let Some(prompt) = session.submit_pending() {
                    textarea = TextArea::default();
                    tx.send(Action::SendPrompt(prompt))?;
                }
            }
            Event::KeyboardPaste(text) => {
                textarea.insert_str(&text);
            }
            Event::KeyboardCharInput(input) => {
                textarea.input(input);
            }
            Event::UIScrollUp() => {
                session.scroll.up();
            }
            Event::UIScrollDown() => {
                session.scroll.down();
            }
            Event::UIScrollPageUp() => {
                session.scroll.up_page();
            }
            Event::UIScrollPageDown() => {
                session.scroll.down_page();
            }
            Event::UITick() => continue,
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    disable_raw_mode().unwrap();
    crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture).unwrap();
    crossterm::execute!(io::stdout(), cursor::Show).unwrap();
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(rx);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let mut session = SessionState::new();

    // The startup list fetch. Its failure is tolerated; the sidebar just
    // starts out empty.
    tx.send(Action::RefreshConversations())?;

    start_loop(&mut terminal, &mut session, tx, &mut events).await?;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    return Ok(());
}
