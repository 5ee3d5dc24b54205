use clap::Args;
use shelf::record::{
    BookRecord, Field, DEFAULT_AUTHOR, DEFAULT_CATEGORY, DEFAULT_DESCRIPTION, DEFAULT_TITLE,
};

/// Book details given on the command line, a blank value clears the detail.
#[derive(Debug, Default, Args)]
pub struct BookArgs {
    /// Title of the book
    #[clap(long)]
    title: Option<String>,

    /// Author(s) of the book
    #[clap(long)]
    author: Option<String>,

    /// Short description of the book
    #[clap(long)]
    description: Option<String>,

    /// Category or subjects of the book
    #[clap(long)]
    category: Option<String>,

    /// Year of publication
    #[clap(long)]
    year: Option<u32>,

    /// Open Library work or edition id, e.g. OL45883W or OL7353617M
    #[clap(long)]
    external_id: Option<String>,

    /// URL of a cover image, used instead of looking one up
    #[clap(long)]
    cover: Option<String>,
}

impl BookArgs {
    /// Overwrites the details of `record` that were given.
    pub fn apply(self, record: &mut BookRecord) {
        if let Some(title) = self.title {
            record.title = Field::from_text(&title, DEFAULT_TITLE);
        }
        if let Some(author) = self.author {
            record.author = Field::from_text(&author, DEFAULT_AUTHOR);
        }
        if let Some(description) = self.description {
            record.description = Field::from_text(&description, DEFAULT_DESCRIPTION);
        }
        if let Some(category) = self.category {
            record.category = Field::from_text(&category, DEFAULT_CATEGORY);
        }
        if let Some(year) = self.year {
            record.publication_year = Field::from_year(year);
        }
        if let Some(id) = self.external_id {
            record.set_external_id(&id);
        }
        if let Some(cover) = self.cover {
            record.set_cover_url(&cover);
        }
    }
}
