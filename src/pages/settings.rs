//! Account settings: profile form, account facts and sign-out.

use backend::Backend;
use backend::schema::UserProfile;
use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::toaster::notify;
use crate::services::profile::{self, ProfileForm};
use crate::state::auth::{AuthState, RoleStatus};
use crate::state::credits::CreditsState;
use crate::state::toast::{Notice, ToastState};
use crate::util::auth::AUTH_ROUTE;

#[component]
pub fn SettingsPage() -> impl IntoView {
    let backend = expect_context::<Backend>();
    let auth = expect_context::<RwSignal<AuthState>>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let credits = expect_context::<RwSignal<CreditsState>>();
    let navigate = use_navigate();
    let stored_backend = StoredValue::new(backend);

    let loaded = RwSignal::new(None::<UserProfile>);
    let form = RwSignal::new(ProfileForm::default());
    let saving = RwSignal::new(false);

    Effect::new(move || {
        let Some(user_id) = auth.with(AuthState::user_id) else { return };
        let backend = stored_backend.get_value();
        leptos::task::spawn_local(async move {
            match profile::fetch_profile(&backend, user_id).await {
                Ok(row) => {
                    form.try_set(ProfileForm::from_profile(&row));
                    loaded.try_set(Some(row));
                }
                Err(e) => log::warn!("settings: profile load failed: {e}"),
            }
        });
    });

    let on_save = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(user_id) = auth.with_untracked(AuthState::user_id) else { return };
        if saving.get_untracked() {
            return;
        }
        saving.set(true);
        let backend = stored_backend.get_value();
        let values = form.get_untracked();
        leptos::task::spawn_local(async move {
            match profile::update_profile(&backend, user_id, &values).await {
                Ok(()) => notify(toasts, Notice::info("Profile updated", "Your profile has been successfully updated.")),
                Err(e) => notify(toasts, Notice::error("Update failed", e.user_message())),
            }
            saving.try_set(false);
        });
    };

    let on_sign_out = move |_| {
        let backend = stored_backend.get_value();
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            crate::services::session::sign_out(&backend, &auth).await;
            credits.update(CreditsState::reset);
            notify(toasts, Notice::info("Signed out", "You have been successfully signed out."));
            navigate(AUTH_ROUTE, NavigateOptions::default());
        });
    };

    let email = move || auth.with(|a| a.user.as_ref().and_then(|u| u.email.clone()).unwrap_or_default());
    let initial = move || {
        let mail = email();
        loaded.with(|p| profile::initial(p.as_ref(), Some(mail.as_str())))
    };
    let role = move || match auth.with(|a| a.role) {
        RoleStatus::Known(role) => role.as_str(),
        RoleStatus::Unknown | RoleStatus::Loading => "...",
        RoleStatus::Failed => "unknown",
    };
    let member_since = move || {
        loaded.with(|p| {
            p.as_ref()
                .and_then(|p| p.created_at)
                .map(|at| at.format("%B %-d, %Y").to_string())
                .unwrap_or_default()
        })
    };

    view! {
        <div class="settings-page">
            <h1>"Settings"</h1>
            <section class="settings-page__card">
                <div class="avatar">
                    {move || {
                        let url = form.with(|f| f.avatar_url.trim().to_owned());
                        if url.is_empty() {
                            view! { <span class="avatar__initial">{initial()}</span> }.into_any()
                        } else {
                            view! { <img class="avatar__image" src=url alt="Avatar"/> }.into_any()
                        }
                    }}
                </div>
                <form class="settings-form" on:submit=on_save>
                    <label class="field">
                        <span>"Avatar URL"</span>
                        <input
                            type="url"
                            placeholder="https://example.com/avatar.jpg"
                            prop:value=move || form.with(|f| f.avatar_url.clone())
                            on:input=move |ev| form.update(|f| f.avatar_url = event_target_value(&ev))
                        />
                    </label>
                    <label class="field">
                        <span>"Full Name"</span>
                        <input
                            type="text"
                            placeholder="Enter your full name"
                            prop:value=move || form.with(|f| f.full_name.clone())
                            on:input=move |ev| form.update(|f| f.full_name = event_target_value(&ev))
                        />
                    </label>
                    <label class="field">
                        <span>"Email"</span>
                        <input type="email" disabled=true prop:value=email/>
                    </label>
                    <button class="button" type="submit" disabled=move || saving.get()>
                        {move || if saving.get() { "Saving..." } else { "Save Changes" }}
                    </button>
                </form>
            </section>
            <section class="settings-page__card">
                <h2>"Account"</h2>
                <dl>
                    <dt>"Email Address"</dt>
                    <dd>{email}</dd>
                    <dt>"Account Role"</dt>
                    <dd>{role}</dd>
                    <dt>"Member Since"</dt>
                    <dd>{member_since}</dd>
                </dl>
                <button class="button button--destructive" on:click=on_sign_out>
                    "Sign Out"
                </button>
            </section>
        </div>
    }
}
