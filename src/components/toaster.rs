//! Toast stack in the bottom-right corner.
//!
//! DESIGN
//! ======
//! Pages never touch [`ToastState`] directly; they call [`notify`], which
//! pushes the notice and schedules its own dismissal.

use leptos::prelude::*;

use crate::config::TOAST_DISMISS_MS;
use crate::state::toast::{Notice, ToastState, ToastVariant};

/// Show `notice` and dismiss it after [`TOAST_DISMISS_MS`].
pub fn notify(toasts: RwSignal<ToastState>, notice: Notice) {
    let Some(id) = toasts.try_update(|t| t.push(notice)) else {
        return;
    };
    leptos::task::spawn_local(async move {
        crate::util::timer::sleep_ms(TOAST_DISMISS_MS).await;
        toasts.try_update(|t| t.dismiss(id));
    });
}

#[component]
pub fn Toaster() -> impl IntoView {
    let toasts = expect_context::<RwSignal<ToastState>>();

    view! {
        <ol class="toaster" aria-live="polite">
            <For
                each=move || toasts.get().toasts
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let destructive = toast.notice.variant == ToastVariant::Destructive;
                    let description = toast.notice.description;
                    view! {
                        <li class="toast" class:toast--destructive=destructive>
                            <div class="toast__body">
                                <p class="toast__title">{toast.notice.title}</p>
                                {(!description.is_empty())
                                    .then(|| view! { <p class="toast__description">{description}</p> })}
                            </div>
                            <button
                                class="toast__close"
                                aria-label="Dismiss"
                                on:click=move |_| toasts.update(|t| t.dismiss(id))
                            >
                                "×"
                            </button>
                        </li>
                    }
                }
            />
        </ol>
    }
}
