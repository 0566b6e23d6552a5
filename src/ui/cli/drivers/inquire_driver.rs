use crate::ui::cli::drivers::PromptDriver;
use anyhow::Result;
use inquire::{Confirm, CustomType, Select, Text, validator::Validation};

pub struct InquireDriver;

impl PromptDriver for InquireDriver {
    fn ask_bool(&self, title: &str, help: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new(title)
            .with_default(default)
            .with_help_message(help)
            .prompt()?)
    }

    fn ask_string(&self, title: &str, help: &str, default: &str) -> Result<String> {
        Ok(Text::new(title)
            .with_initial_value(default)
            .with_help_message(help)
            .prompt()?)
    }

    fn ask_u64(
        &self,
        title: &str,
        help: &str,
        default: u64,
        min: Option<u64>,
        max: Option<u64>,
    ) -> Result<u64> {
        let lo = min.unwrap_or(u64::MIN);
        let hi = max.unwrap_or(u64::MAX);

        let q = CustomType::<u64>::new(title)
            .with_default(default)
            .with_help_message(help)
            .with_validator(move |x: &u64| {
                if (lo..=hi).contains(x) {
                    Ok(Validation::Valid)
                } else if hi == u64::MAX {
                    Ok(Validation::Invalid(format!("Must be ≥ {lo}").into()))
                } else {
                    Ok(Validation::Invalid(
                        format!("Must be between {lo} and {hi}").into(),
                    ))
                }
            });

        Ok(q.prompt()?)
    }

    fn ask_select(
        &self,
        title: &str,
        help: &str,
        options: &[String],
        default: usize,
    ) -> Result<usize> {
        let mut select = Select::new(title, options.to_vec()).with_starting_cursor(default);
        if !help.is_empty() {
            select = select.with_help_message(help);
        }
        Ok(select.raw_prompt()?.index)
    }
}
