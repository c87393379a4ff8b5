use crate::ai::{ChatSession, GenerationProvider, generate_flashcards, generate_quiz};
use crate::chat::{ChatEvent, stream_exchange};
use crate::error::{GenerationFailure, GenerationKind, ProviderError};
use crate::logger;
use crate::models::{AiRequest, AiResponse};
use crossbeam_channel::{Receiver, Sender};
use std::io;
use std::sync::Arc;
use std::thread;
use tokio::runtime::Runtime;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Start the thread that runs provider calls. Each request becomes its own
/// task; chat exchanges are serialised on the shared session.
pub fn spawn_ai_worker(
    provider: Arc<dyn GenerationProvider>,
    session: Box<dyn ChatSession>,
    ai_tx: Sender<AiResponse>,
    ai_rx: Receiver<AiRequest>,
) -> io::Result<thread::JoinHandle<()>> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("study-buddy::ai")
        .build()?;
    let session = Arc::new(Mutex::new(session));

    thread::Builder::new()
        .name("study-buddy::ai_worker".to_string())
        .spawn(move || {
            while let Ok(request) = ai_rx.recv() {
                dispatch(&runtime, &provider, &session, &ai_tx, request);
            }
            logger::log("Worker channel disconnected, exiting");
        })
}

fn dispatch(
    runtime: &Runtime,
    provider: &Arc<dyn GenerationProvider>,
    session: &Arc<Mutex<Box<dyn ChatSession>>>,
    ai_tx: &Sender<AiResponse>,
    request: AiRequest,
) {
    let tx = ai_tx.clone();
    match request {
        AiRequest::GenerateQuiz { topic } => {
            logger::log("Worker received quiz request");
            let provider = Arc::clone(provider);
            let task = runtime.spawn(async move {
                let result = generate_quiz(provider.as_ref(), &topic).await;
                let _ = tx.send(AiResponse::Quiz(result));
            });
            supervise(runtime, task, ai_tx, || {
                AiResponse::Quiz(Err(GenerationFailure::new(
                    GenerationKind::Quiz,
                    task_died(),
                )))
            });
        }
        AiRequest::GenerateFlashcards { topic } => {
            logger::log("Worker received flashcards request");
            let provider = Arc::clone(provider);
            let task = runtime.spawn(async move {
                let result = generate_flashcards(provider.as_ref(), &topic).await;
                let _ = tx.send(AiResponse::Flashcards(result));
            });
            supervise(runtime, task, ai_tx, || {
                AiResponse::Flashcards(Err(GenerationFailure::new(
                    GenerationKind::Flashcards,
                    task_died(),
                )))
            });
        }
        AiRequest::SendChat { message } => {
            logger::log("Worker received chat message");
            let session = Arc::clone(session);
            let task = runtime.spawn(async move {
                let mut session = session.lock().await;
                stream_exchange(&mut **session, &message, |event| {
                    let _ = tx.send(AiResponse::Chat(event));
                })
                .await;
            });
            supervise(runtime, task, ai_tx, || {
                AiResponse::Chat(ChatEvent::Failed(task_died().into()))
            });
        }
    }
}

fn task_died() -> ProviderError {
    ProviderError::Worker("request task panicked".to_string())
}

/// Report a failure for `task` if it panics before sending its own result.
fn supervise(
    runtime: &Runtime,
    task: JoinHandle<()>,
    ai_tx: &Sender<AiResponse>,
    on_panic: impl FnOnce() -> AiResponse + Send + 'static,
) {
    let tx = ai_tx.clone();
    runtime.spawn(async move {
        if let Err(e) = task.await
            && e.is_panic()
        {
            logger::log(&format!("Worker task panicked: {}", e));
            let _ = tx.send(on_panic());
        }
    });
}
