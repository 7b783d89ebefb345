//! `meals` subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use lunchdesk_client::Console;
use lunchdesk_core::forms::MealForm;
use lunchdesk_core::{MealDay, MealId, Pager};

use super::{CliError, Credentials, authenticate, confirmer, print_deleted, print_json, read_image};

#[derive(Subcommand)]
pub enum MealAction {
    /// List meals offered on a day
    List {
        #[arg(short, long)]
        day: MealDay,
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Create a meal
    Create {
        #[arg(short, long)]
        day: MealDay,
        #[command(flatten)]
        fields: MealFields,
    },
    /// Update a meal
    Update {
        id: String,
        /// Day the meal is currently listed under
        #[arg(long)]
        listed_day: MealDay,
        /// New day (defaults to the listed day)
        #[arg(short, long)]
        day: Option<MealDay>,
        #[command(flatten)]
        fields: MealFields,
    },
    /// Delete a meal
    Delete {
        id: String,
        /// Day the meal is listed under
        #[arg(short, long)]
        day: MealDay,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Args)]
pub struct MealFields {
    #[arg(long)]
    description: String,
    /// Price, e.g. `12.50`
    #[arg(long)]
    price: String,
    /// Main image file
    #[arg(long)]
    main_image: Option<PathBuf>,
    /// Additional image file (repeatable, at most 5)
    #[arg(long = "image")]
    images: Vec<PathBuf>,
}

impl MealFields {
    fn into_form(self, day: MealDay) -> Result<MealForm, CliError> {
        let mut form = MealForm::new(day);
        form.description = self.description;
        form.price = self.price;
        form.main_image = self.main_image.as_deref().map(read_image).transpose()?;
        for path in &self.images {
            form.add_other_image(read_image(path)?)?;
        }
        Ok(form)
    }
}

pub async fn run(console: &Console, credentials: Credentials, action: MealAction) -> Result<(), CliError> {
    authenticate(console, credentials).await?;

    match action {
        MealAction::List { day, page } => {
            let pager = Pager::at(page, console.pager().limit());
            print_json(&*console.meals(day, &pager).await?)
        }
        MealAction::Create { day, fields } => {
            let meal = console.create_meal(&fields.into_form(day)?).await?;
            print_json(&meal)
        }
        MealAction::Update {
            id,
            listed_day,
            day,
            fields,
        } => {
            let form = fields.into_form(day.unwrap_or(listed_day))?;
            let meal = console
                .update_meal(&MealId::new(id), listed_day, &form)
                .await?;
            print_json(&meal)
        }
        MealAction::Delete { id, day, yes } => {
            let outcome = console
                .delete_meal(&MealId::new(id), day, confirmer(yes))
                .await?;
            print_deleted(&outcome)
        }
    }
}
