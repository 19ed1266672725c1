//! Image picker that uploads straight to object storage.
//!
//! DESIGN
//! ======
//! The parent only learns the public URL through `on_uploaded`; an empty
//! string means the image was removed. Removing an image this component
//! uploaded also deletes the stored object so abandoned forms leave no
//! orphans behind.

use backend::Backend;
use leptos::prelude::*;

use crate::services::images::UploadedImage;
use crate::state::toast::ToastState;

#[component]
pub fn ImageUpload(
    on_uploaded: Callback<String>,
    #[prop(into, default = Signal::stored(None))] current: Signal<Option<String>>,
    #[prop(default = "Upload Image")] label: &'static str,
) -> impl IntoView {
    let backend = expect_context::<Backend>();
    let toasts = expect_context::<RwSignal<ToastState>>();
    let input_ref = NodeRef::<leptos::html::Input>::new();
    let uploading = RwSignal::new(false);
    let uploaded = RwSignal::new(None::<UploadedImage>);

    let preview = move || {
        uploaded
            .with(|u| u.as_ref().map(|img| img.url.clone()))
            .or_else(|| current.get().filter(|url| !url.is_empty()))
    };

    let on_change = {
        let backend = backend.clone();
        move |_: leptos::ev::Event| {
            #[cfg(feature = "csr")]
            {
                use crate::state::toast::Notice;

                let Some(file) = input_ref.get().and_then(|input| input.files()).and_then(|files| files.get(0)) else {
                    return;
                };
                let content_type = file.type_();
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let size = file.size() as usize;
                if let Err(notice) = crate::services::images::check_image(&content_type, size) {
                    crate::components::toaster::notify(toasts, notice);
                    return;
                }
                uploading.set(true);
                let backend = backend.clone();
                leptos::task::spawn_local(async move {
                    let result = match read_file(&file).await {
                        Ok(bytes) => {
                            let bucket = backend.config().image_bucket.clone();
                            crate::services::images::upload_image(&backend, &file.name(), bytes, &content_type, &bucket)
                                .await
                        }
                        Err(e) => Err(e),
                    };
                    match result {
                        Ok(image) => {
                            on_uploaded.run(image.url.clone());
                            uploaded.set(Some(image));
                            crate::components::toaster::notify(
                                toasts,
                                Notice::info("Upload successful!", "Image has been uploaded successfully."),
                            );
                        }
                        Err(e) => {
                            log::error!("image upload: {e}");
                            crate::components::toaster::notify(toasts, Notice::error("Upload failed", e.user_message()));
                        }
                    }
                    uploading.set(false);
                });
            }
            #[cfg(not(feature = "csr"))]
            {
                let _ = (&backend, input_ref, toasts);
            }
        }
    };

    let on_remove = move |_| {
        if let Some(image) = uploaded.get_untracked() {
            let backend = backend.clone();
            leptos::task::spawn_local(async move {
                let bucket = backend.config().image_bucket.clone();
                if let Err(e) = crate::services::images::delete_image(&backend, &image.path, &bucket).await {
                    log::warn!("image upload: cleanup of {} failed: {e}", image.path);
                }
            });
        }
        uploaded.set(None);
        on_uploaded.run(String::new());
    };

    let open_picker = move |_| {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    view! {
        <div class="image-upload" class:image-upload--busy=move || uploading.get()>
            <label class="image-upload__label">{label}</label>
            <input
                node_ref=input_ref
                class="image-upload__input"
                type="file"
                accept="image/*"
                hidden=true
                on:change=on_change
            />
            {move || match preview() {
                Some(url) => view! {
                    <div class="image-upload__preview">
                        <img src=url alt="Preview"/>
                        <button type="button" class="button button--destructive" on:click=on_remove.clone()>
                            "Remove"
                        </button>
                    </div>
                }
                .into_any(),
                None => view! {
                    <button
                        type="button"
                        class="image-upload__drop"
                        disabled=move || uploading.get()
                        on:click=open_picker
                    >
                        {move || if uploading.get() { "Uploading..." } else { "Click to upload an image" }}
                    </button>
                }
                .into_any(),
            }}
        </div>
    }
}

#[cfg(feature = "csr")]
async fn read_file(file: &web_sys::File) -> Result<Vec<u8>, crate::error::ServiceError> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| crate::error::ServiceError::Browser(format!("{e:?}")))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}
