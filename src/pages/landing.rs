//! The `/` route. Renders nothing itself: the landing guard sends admins to
//! the dashboard and everyone else to explore.

use leptos::prelude::*;

use crate::components::guard::{GuardKind, Guarded};

#[component]
pub fn LandingPage() -> impl IntoView {
    view! {
        <Guarded kind=GuardKind::Landing>
            <div class="landing"></div>
        </Guarded>
    }
}
