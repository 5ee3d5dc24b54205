use dialoguer::Input;
use eyre::{eyre, Context, Result};
use shelf::record::{
    BookRecord, Field, DEFAULT_AUTHOR, DEFAULT_CATEGORY, DEFAULT_DESCRIPTION, DEFAULT_TITLE,
};

pub fn user_select<S: ToString>(prompt: &str, items: &[S]) -> Result<usize> {
    let selection = dialoguer::Select::with_theme(&dialoguer::theme::ColorfulTheme::default())
        .with_prompt(prompt)
        .default(0)
        .items(items)
        .interact_opt()
        .wrap_err_with(|| eyre!("User selection cancelled"))?;

    if let Some(index) = selection {
        Ok(index)
    } else {
        Err(eyre!("No selection made - cancelling operation"))
    }
}

/// Free text answer, blank answers are allowed.
pub fn user_input(prompt: &str) -> Result<String> {
    Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .wrap_err_with(|| eyre!("User input cancelled"))
}

fn user_text(field: &mut Field<String>, prompt: &str, placeholder: &str) -> Result<()> {
    if !field.is_set() {
        *field = Field::from_text(&user_input(prompt)?, placeholder);
    }
    Ok(())
}

/// Prompts for every required field of `record` without a real value.
///
/// Fields left blank stay empty so saving can still fill them.
pub fn user_fill_record(record: &mut BookRecord) -> Result<()> {
    println!("Missing details for: {record}");

    user_text(&mut record.title, "Title", DEFAULT_TITLE)?;
    user_text(&mut record.author, "Author", DEFAULT_AUTHOR)?;
    user_text(&mut record.description, "Description", DEFAULT_DESCRIPTION)?;
    user_text(&mut record.category, "Category", DEFAULT_CATEGORY)?;

    while !record.publication_year.is_set() {
        let input = user_input("Publication year")?;
        let input = input.trim();
        if input.is_empty() {
            break;
        }
        match input.parse() {
            Ok(year) => record.publication_year = Field::from_year(year),
            Err(_) => println!("'{input}' is not a year"),
        }
    }

    Ok(())
}
