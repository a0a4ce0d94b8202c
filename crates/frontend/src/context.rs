//! Session context and provider

use crate::config::AppConfig;
use crate::storage::LocalStorageStore;
use gloo::timers::callback::Interval;
use tracing::warn;
use turnstile_http::{AuthServiceClient, ClientError};
use turnstile_session::{AuthState, Session};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

/// Session used throughout the application
pub type AppSession = Session<LocalStorageStore>;

/// Session handle shared through the component tree
#[derive(Clone)]
pub struct SessionContext(pub AppSession);

impl PartialEq for SessionContext {
    fn eq(&self, other: &Self) -> bool {
        self.0.ptr_eq(&other.0)
    }
}

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    pub children: Children,
}

/// Provides the session and the current [`AuthState`] to its children
///
/// The stored session is evaluated on mount (refreshing it if expired) and
/// again every [`AppConfig::SESSION_CHECK_INTERVAL_MS`] while signed in.
#[function_component(SessionProvider)]
pub fn session_provider(props: &SessionProviderProps) -> Html {
    let built = use_memo((), |()| build_session());
    let session = (*built).as_ref().ok().cloned();
    let auth_state = use_state(AuthState::default);

    // Mirror published state and evaluate the stored session on mount
    {
        let session = session.clone();
        let auth_state = auth_state.clone();
        use_effect_with((), move |()| {
            if let Some(session) = session {
                let mut changes = session.subscribe();
                spawn_local(async move {
                    while changes.changed().await.is_ok() {
                        auth_state.set(changes.borrow_and_update().clone());
                    }
                });
                spawn_local(async move {
                    match session.update_authentication_state().await {
                        Ok(true) => {
                            if let Err(err) = session.load_profile().await {
                                warn!(error = %err, "Failed to load profile");
                            }
                        }
                        Ok(false) => {}
                        Err(err) => warn!(error = %err, "Session check failed"),
                    }
                });
            }
        });
    }

    // Periodic re-evaluation while signed in
    {
        let session = session.clone();
        use_effect_with(auth_state.authenticated, move |authenticated| {
            let interval = session.filter(|_| *authenticated).map(|session| {
                Interval::new(AppConfig::SESSION_CHECK_INTERVAL_MS, move || {
                    let session = session.clone();
                    spawn_local(async move {
                        if let Err(err) = session.update_authentication_state().await {
                            warn!(error = %err, "Session check failed");
                        }
                    });
                })
            });
            move || drop(interval)
        });
    }

    match &*built {
        Ok(session) => html! {
            <ContextProvider<SessionContext> context={SessionContext(session.clone())}>
                <ContextProvider<AuthState> context={(*auth_state).clone()}>
                    {props.children.clone()}
                </ContextProvider<AuthState>>
            </ContextProvider<SessionContext>>
        },
        Err(err) => html! {
            <div class="error">{format!("Authentication service unavailable: {err}")}</div>
        },
    }
}

fn build_session() -> Result<AppSession, ClientError> {
    let client = AuthServiceClient::new(AppConfig::api_base_url())?;
    Ok(Session::new(LocalStorageStore::new(), client))
}

/// Hook to use the session
#[hook]
pub fn use_session() -> AppSession {
    use_context::<SessionContext>()
        .expect("SessionContext not found. Make sure to wrap your component with SessionProvider")
        .0
}

/// Hook to get the current authentication state
#[hook]
pub fn use_auth_state() -> AuthState {
    use_context::<AuthState>().unwrap_or_default()
}
