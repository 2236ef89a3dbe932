use reedline::{Prompt, PromptEditMode, PromptHistorySearch};
use std::borrow::Cow;

pub struct MinibashPrompt {
    text: Cow<'static, str>,
}

impl MinibashPrompt {
    pub fn new(custom: Option<String>) -> Self {
        Self {
            text: custom
                .map(Cow::Owned)
                .unwrap_or(Cow::Borrowed("minibash$ ")),
        }
    }
}

impl Prompt for MinibashPrompt {
    fn render_prompt_left(&self) -> Cow<'static, str> {
        self.text.clone()
    }

    fn render_prompt_right(&self) -> Cow<'static, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _mode: PromptEditMode) -> Cow<'static, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'static, str> {
        Cow::Borrowed("")
    }

    fn render_prompt_history_search_indicator(
        &self,
        _history_search: PromptHistorySearch,
    ) -> Cow<'static, str> {
        Cow::Borrowed("? ")
    }
}
