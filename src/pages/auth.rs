//! Sign-in / sign-up page, the only route outside the guards.

use backend::{Backend, SignUp};
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::toaster::notify;
use crate::state::auth::AuthState;
use crate::state::toast::{Notice, ToastState};
use crate::util::auth::install_signed_in_redirect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tab {
    SignIn,
    SignUp,
}

/// Where the confirmation email should send the user back to.
fn email_redirect() -> String {
    #[cfg(feature = "csr")]
    {
        if let Some(origin) = web_sys::window().and_then(|w| w.location().origin().ok()) {
            return format!("{origin}/");
        }
    }
    "/".to_owned()
}

#[component]
pub fn AuthPage() -> impl IntoView {
    let auth = expect_context::<RwSignal<AuthState>>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let backend = expect_context::<Backend>();
    let navigate = use_navigate();

    install_signed_in_redirect(auth, navigate.clone());

    let tab = RwSignal::new(Tab::SignIn);
    let full_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let show_password = RwSignal::new(false);
    let busy = RwSignal::new(false);

    let on_sign_in = {
        let backend = backend.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            if busy.get() {
                return;
            }
            busy.set(true);
            let backend = backend.clone();
            let navigate = navigate.clone();
            let (email_value, password_value) = (email.get(), password.get());
            leptos::task::spawn_local(async move {
                match crate::services::session::sign_in(&backend, &email_value, &password_value).await {
                    Ok(_) => {
                        notify(toasts, Notice::info("Welcome back!", "You have successfully signed in."));
                        navigate("/", NavigateOptions { replace: true, ..NavigateOptions::default() });
                    }
                    Err(e) => {
                        log::warn!("auth page: sign-in failed: {e}");
                        notify(toasts, Notice::error("Sign in failed", e.user_message()));
                    }
                }
                busy.set(false);
            });
        }
    };

    let on_sign_up = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get() {
            return;
        }
        busy.set(true);
        let backend = backend.clone();
        let (name_value, email_value, password_value) = (full_name.get(), email.get(), password.get());
        leptos::task::spawn_local(async move {
            let name = Some(name_value.trim()).filter(|n| !n.is_empty());
            let redirect = email_redirect();
            match crate::services::session::sign_up(&backend, &email_value, &password_value, name, &redirect).await {
                Ok(SignUp::Session(_)) => {
                    notify(toasts, Notice::info("Account created!", "You are now signed in."));
                }
                Ok(SignUp::Pending(_)) => {
                    notify(toasts, Notice::info("Account created!", "Please check your email to verify your account."));
                    tab.set(Tab::SignIn);
                }
                Err(e) => notify(toasts, Notice::error("Sign up failed", e.user_message())),
            }
            busy.set(false);
        });
    };

    let password_input = move || {
        view! {
            <label class="field">
                <span>"Password"</span>
                <div class="field__row">
                    <input
                        type=move || if show_password.get() { "text" } else { "password" }
                        required=true
                        minlength="6"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button type="button" class="field__toggle" on:click=move |_| show_password.update(|s| *s = !*s)>
                        {move || if show_password.get() { "Hide" } else { "Show" }}
                    </button>
                </div>
            </label>
        }
    };

    view! {
        <div class="auth-page">
            <div class="auth-card">
                <h1>"AI Studio"</h1>
                <div class="tabs" role="tablist">
                    <button
                        class="tabs__trigger"
                        class:tabs__trigger--active=move || tab.get() == Tab::SignIn
                        on:click=move |_| tab.set(Tab::SignIn)
                    >
                        "Sign In"
                    </button>
                    <button
                        class="tabs__trigger"
                        class:tabs__trigger--active=move || tab.get() == Tab::SignUp
                        on:click=move |_| tab.set(Tab::SignUp)
                    >
                        "Sign Up"
                    </button>
                </div>
                <Show
                    when=move || tab.get() == Tab::SignIn
                    fallback=move || {
                        view! {
                            <form class="auth-form" on:submit=on_sign_up.clone()>
                                <label class="field">
                                    <span>"Full name"</span>
                                    <input
                                        type="text"
                                        prop:value=move || full_name.get()
                                        on:input=move |ev| full_name.set(event_target_value(&ev))
                                    />
                                </label>
                                <label class="field">
                                    <span>"Email"</span>
                                    <input
                                        type="email"
                                        required=true
                                        prop:value=move || email.get()
                                        on:input=move |ev| email.set(event_target_value(&ev))
                                    />
                                </label>
                                {password_input()}
                                <button class="button" type="submit" disabled=move || busy.get()>
                                    {move || if busy.get() { "Creating account..." } else { "Create Account" }}
                                </button>
                            </form>
                        }
                    }
                >
                    <form class="auth-form" on:submit=on_sign_in.clone()>
                        <label class="field">
                            <span>"Email"</span>
                            <input
                                type="email"
                                required=true
                                prop:value=move || email.get()
                                on:input=move |ev| email.set(event_target_value(&ev))
                            />
                        </label>
                        {password_input()}
                        <button class="button" type="submit" disabled=move || busy.get()>
                            {move || if busy.get() { "Signing in..." } else { "Sign In" }}
                        </button>
                    </form>
                </Show>
            </div>
        </div>
    }
}
