use instructor_dashboard::api::ApiClient;
use instructor_dashboard::app::state::AppContext;
use instructor_dashboard::app::App;
use instructor_dashboard::config::{Preferences, Settings};
use instructor_dashboard::session::SessionStore;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("instructor_dashboard=info")),
        )
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };
    let session = SessionStore::open(settings.session_path());
    let preferences = Preferences::load(&settings.config_path());
    let api = match ApiClient::new(&settings, session.clone()) {
        Ok(api) => api,
        Err(e) => {
            error!(error = %e, "could not build the HTTP client");
            std::process::exit(2);
        }
    };
    info!(base_url = %settings.api_base_url, data_dir = %settings.data_dir.display(), "starting");

    let ctx = AppContext {
        settings,
        api,
        session,
        preferences,
    };

    iced::application(App::title, App::update, App::view)
        .theme(App::theme)
        .subscription(App::subscription)
        .window_size(iced::Size::new(1400.0, 800.0))
        .run_with(move || App::boot(ctx))
}
