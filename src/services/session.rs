use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Mutex;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{FlashcardSet, HistoryEntry, QuizScore, QuizSet, SummaryResult, UserAnswers},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskKind {
    Quiz,
    Summary,
    Flashcards,
}

/// A quiz being taken, or reviewed once `finished` is set.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizProgress {
    pub quiz: QuizSet,
    pub answers: UserAnswers,
    pub current: usize,
    pub finished: bool,
}

impl QuizProgress {
    pub fn new(quiz: QuizSet) -> Self {
        let answers = UserAnswers::for_quiz(&quiz);
        Self {
            quiz,
            answers,
            current: 0,
            finished: false,
        }
    }

    pub fn score(&self) -> Option<QuizScore> {
        self.finished.then(|| self.quiz.grade(&self.answers))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "camelCase")]
pub enum StudyResult {
    Quiz(QuizProgress),
    Summary(SummaryResult),
    Flashcards(FlashcardSet),
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "camelCase")]
pub enum SessionState {
    #[default]
    Idle,
    Extracting,
    Generating(TaskKind),
    Viewing(StudyResult),
    Error(String),
}

impl SessionState {
    fn is_in_flight(&self) -> bool {
        matches!(self, SessionState::Extracting | SessionState::Generating(_))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    ExtractionStarted,
    ExtractionFinished,
    ExtractionFailed(String),
    GenerationStarted(TaskKind),
    QuizReceived(QuizSet),
    SummaryReceived(SummaryResult),
    FlashcardsReceived(FlashcardSet),
    GenerationFailed(String),
    AnswerSelected(String),
    NextQuestion,
    HistoryLoaded(HistoryEntry),
    Restart,
}

impl SessionEvent {
    fn label(&self) -> &'static str {
        match self {
            SessionEvent::ExtractionStarted => "start extraction",
            SessionEvent::ExtractionFinished => "finish extraction",
            SessionEvent::ExtractionFailed(_) => "fail extraction",
            SessionEvent::GenerationStarted(_) => "start generation",
            SessionEvent::QuizReceived(_) => "show quiz",
            SessionEvent::SummaryReceived(_) => "show summary",
            SessionEvent::FlashcardsReceived(_) => "show flashcards",
            SessionEvent::GenerationFailed(_) => "fail generation",
            SessionEvent::AnswerSelected(_) => "select answer",
            SessionEvent::NextQuestion => "next question",
            SessionEvent::HistoryLoaded(_) => "load history entry",
            SessionEvent::Restart => "restart",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// A quiz was completed and belongs in history.
    RecordAttempt(QuizSet, UserAnswers),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: SessionState,
    pub effect: Option<Effect>,
}

impl Transition {
    fn to(state: SessionState) -> Self {
        Self {
            state,
            effect: None,
        }
    }
}

/// Computes the next state. Events that do not apply leave the state unchanged.
pub fn transition(state: SessionState, event: SessionEvent) -> Transition {
    apply(state, event).unwrap_or_else(Transition::to)
}

/// `Err` hands the untouched state back when the event does not apply.
fn apply(state: SessionState, event: SessionEvent) -> Result<Transition, SessionState> {
    use SessionEvent as E;
    use SessionState as S;

    match (state, event) {
        (_, E::Restart) => Ok(Transition::to(S::Idle)),

        (state, E::ExtractionStarted) if !state.is_in_flight() => Ok(Transition::to(S::Extracting)),
        (S::Extracting, E::ExtractionFinished) => Ok(Transition::to(S::Idle)),
        (S::Extracting, E::ExtractionFailed(message)) => Ok(Transition::to(S::Error(message))),

        (state, E::GenerationStarted(kind)) if !state.is_in_flight() => {
            Ok(Transition::to(S::Generating(kind)))
        }
        (S::Generating(TaskKind::Quiz), E::QuizReceived(quiz)) => Ok(Transition::to(S::Viewing(
            StudyResult::Quiz(QuizProgress::new(quiz)),
        ))),
        (S::Generating(TaskKind::Summary), E::SummaryReceived(summary)) => {
            Ok(Transition::to(S::Viewing(StudyResult::Summary(summary))))
        }
        (S::Generating(TaskKind::Flashcards), E::FlashcardsReceived(cards)) => {
            Ok(Transition::to(S::Viewing(StudyResult::Flashcards(cards))))
        }
        (S::Generating(_), E::GenerationFailed(message)) => Ok(Transition::to(S::Error(message))),

        (S::Viewing(StudyResult::Quiz(mut progress)), E::AnswerSelected(answer)) => {
            let offered = progress
                .quiz
                .quiz
                .get(progress.current)
                .is_some_and(|q| q.options.contains(&answer));
            if progress.finished || !offered {
                return Err(S::Viewing(StudyResult::Quiz(progress)));
            }
            match progress.answers.select(progress.current, answer) {
                Ok(()) => Ok(Transition::to(S::Viewing(StudyResult::Quiz(progress)))),
                Err(_) => Err(S::Viewing(StudyResult::Quiz(progress))),
            }
        }
        (S::Viewing(StudyResult::Quiz(mut progress)), E::NextQuestion) if !progress.finished => {
            if progress.current + 1 < progress.quiz.question_count() {
                progress.current += 1;
                return Ok(Transition::to(S::Viewing(StudyResult::Quiz(progress))));
            }
            progress.finished = true;
            let effect = Effect::RecordAttempt(progress.quiz.clone(), progress.answers.clone());
            Ok(Transition {
                state: S::Viewing(StudyResult::Quiz(progress)),
                effect: Some(effect),
            })
        }

        (state, E::HistoryLoaded(entry)) if !state.is_in_flight() => {
            Ok(Transition::to(S::Viewing(StudyResult::Quiz(QuizProgress {
                quiz: entry.quiz_data,
                answers: entry.user_answers,
                current: 0,
                finished: true,
            }))))
        }

        (state, _) => Err(state),
    }
}

/// Identifies one extraction or generation request. Only the latest ticket may complete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ticket(u64);

/// Owns the session state and decides which completions are still wanted.
#[derive(Debug, Default)]
pub struct StudySession {
    state: SessionState,
    issued: u64,
    in_flight: Option<Ticket>,
    dictating: bool,
}

impl StudySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_dictating(&self) -> bool {
        self.dictating
    }

    pub fn begin_extraction(&mut self) -> AppResult<Ticket> {
        if self.dictating {
            return Err(AppError::Busy(
                "Stop dictation before uploading a file.".to_string(),
            ));
        }
        self.begin(SessionEvent::ExtractionStarted)
    }

    pub fn begin_generation(&mut self, kind: TaskKind) -> AppResult<Ticket> {
        self.begin(SessionEvent::GenerationStarted(kind))
    }

    fn begin(&mut self, event: SessionEvent) -> AppResult<Ticket> {
        if self.in_flight.is_some() {
            return Err(AppError::Busy(
                "Another request is still being processed.".to_string(),
            ));
        }
        self.issued += 1;
        let ticket = Ticket(self.issued);
        self.in_flight = Some(ticket);
        self.dispatch(event);
        Ok(ticket)
    }

    /// Delivers the outcome of a request. A ticket invalidated by `restart` is ignored.
    pub fn complete(&mut self, ticket: Ticket, event: SessionEvent) -> Option<Effect> {
        if self.in_flight != Some(ticket) {
            log::debug!("Discarding stale completion for {:?}", ticket);
            return None;
        }
        self.in_flight = None;
        self.dispatch(event)
    }

    pub fn select_answer(&mut self, answer: impl Into<String>) -> AppResult<()> {
        self.try_dispatch(SessionEvent::AnswerSelected(answer.into()))
            .map(|_| ())
    }

    pub fn next_question(&mut self) -> AppResult<Option<Effect>> {
        self.try_dispatch(SessionEvent::NextQuestion)
    }

    pub fn load_history(&mut self, entry: HistoryEntry) -> AppResult<()> {
        self.try_dispatch(SessionEvent::HistoryLoaded(entry))
            .map(|_| ())
    }

    /// Returns to idle. Any outstanding request is abandoned and its result dropped.
    pub fn restart(&mut self) {
        self.in_flight = None;
        self.dispatch(SessionEvent::Restart);
    }

    /// Drops an outstanding request whose caller went away and returns to idle.
    pub fn abandon(&mut self, ticket: Ticket) {
        if self.in_flight != Some(ticket) {
            return;
        }
        log::info!("Request {:?} was dropped before it completed", ticket);
        self.in_flight = None;
        self.dispatch(SessionEvent::Restart);
    }

    pub fn begin_dictation(&mut self) -> AppResult<()> {
        if matches!(self.state, SessionState::Extracting) {
            return Err(AppError::Busy(
                "Dictation is unavailable while a file is being processed.".to_string(),
            ));
        }
        self.dictating = true;
        Ok(())
    }

    pub fn end_dictation(&mut self) {
        self.dictating = false;
    }

    fn dispatch(&mut self, event: SessionEvent) -> Option<Effect> {
        match self.try_dispatch(event) {
            Ok(effect) => effect,
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }

    fn try_dispatch(&mut self, event: SessionEvent) -> AppResult<Option<Effect>> {
        let state = std::mem::take(&mut self.state);
        let label = event.label();
        match apply(state, event) {
            Ok(transition) => {
                self.state = transition.state;
                Ok(transition.effect)
            }
            Err(unchanged) => {
                let message = format!("Cannot {} in the current state", label);
                log::debug!("{} ({:?})", message, unchanged);
                self.state = unchanged;
                Err(AppError::ValidationError(message))
            }
        }
    }
}

/// Holds a ticket for the lifetime of one request. If the request future is dropped
/// before `complete` runs, the ticket is abandoned so the session does not stay busy.
pub struct PendingRequest {
    session: Arc<Mutex<StudySession>>,
    ticket: Option<Ticket>,
}

impl PendingRequest {
    pub fn new(session: Arc<Mutex<StudySession>>, ticket: Ticket) -> Self {
        Self {
            session,
            ticket: Some(ticket),
        }
    }

    pub async fn complete(mut self, event: SessionEvent) -> Option<Effect> {
        let mut session = self.session.lock().await;
        match self.ticket.take() {
            Some(ticket) => session.complete(ticket, event),
            None => None,
        }
    }
}

impl Drop for PendingRequest {
    fn drop(&mut self) {
        let Some(ticket) = self.ticket.take() else {
            return;
        };
        if let Ok(mut session) = self.session.try_lock() {
            session.abandon(ticket);
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let session = Arc::clone(&self.session);
                handle.spawn(async move { session.lock().await.abandon(ticket) });
            }
            Err(_) => log::warn!("No runtime to release dropped request {:?}", ticket),
        }
    }
}
