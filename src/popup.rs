pub type RetryListener = Box<dyn FnMut()>;

/// Modal banner shown between sessions with a single retry button.
#[derive(Default)]
pub struct Popup {
    text: String,
    visible: bool,
    on_retry: Option<RetryListener>,
}

impl Popup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_retry_listener(&mut self, listener: RetryListener) {
        self.on_retry = Some(listener);
    }

    pub fn show_message(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    /// The player pressed retry. Only a visible popup has a button to press.
    pub fn retry(&mut self) {
        if !self.visible {
            return;
        }
        if let Some(listener) = self.on_retry.as_mut() {
            listener();
        }
        self.hide();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
