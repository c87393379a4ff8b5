use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use study_buddy::{
    AppConfig, GenerationProvider, OpenRouterClient,
    ai_worker::spawn_ai_worker,
    app::App,
    chat::SYSTEM_PROMPT,
    db::{KeyValueStore, MemoryStore, SqliteStore},
    input, logger,
    models::{AiRequest, AiResponse},
    ui,
};

const TICK: Duration = Duration::from_millis(50);

fn open_store(config: &AppConfig) -> Box<dyn KeyValueStore> {
    let path = config.db_path();
    match SqliteStore::open(&path) {
        Ok(store) => {
            logger::log(&format!("Opened store at {}", path.display()));
            Box::new(store)
        }
        Err(e) => {
            logger::log(&format!(
                "Could not open {}: {}. Saved data will not persist",
                path.display(),
                e
            ));
            Box::new(MemoryStore::new())
        }
    }
}

fn main() -> io::Result<()> {
    let config = AppConfig::from_env();
    logger::init(&config.log_path());
    logger::log("Starting study-buddy");

    let api_key = match config.api_key() {
        Ok(key) => key.to_string(),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    let client = match OpenRouterClient::new(api_key, config.model.clone()) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Failed to create OpenRouter client: {}", e);
            std::process::exit(1);
        }
    };
    logger::log(&format!("Using model {}", client.model()));

    let provider: Arc<dyn GenerationProvider> = Arc::new(client);
    let session = provider.create_session(SYSTEM_PROMPT);

    let (req_tx, req_rx) = crossbeam_channel::unbounded::<AiRequest>();
    let (resp_tx, resp_rx) = crossbeam_channel::unbounded::<AiResponse>();
    let worker = spawn_ai_worker(provider, session, resp_tx, req_rx)?;

    let mut app = App::new(open_store(&config), req_tx);
    app.chat.attach_session();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &resp_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Dropping the app closes the request channel so the worker exits.
    drop(app);
    if worker.join().is_err() {
        logger::log("AI worker panicked");
    }
    logger::log("Exiting study-buddy");

    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    resp_rx: &crossbeam_channel::Receiver<AiResponse>,
) -> io::Result<()> {
    loop {
        while let Ok(response) = resp_rx.try_recv() {
            app.apply_response(response);
        }

        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
