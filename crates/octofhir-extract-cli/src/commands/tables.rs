use anyhow::Result;
use colored::Colorize;
use octofhir_extract::{Profile, ProjectorOptions};
use serde_json::json;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::cli::TablesArgs;

pub fn list(args: &TablesArgs, options: &ProjectorOptions) -> Result<()> {
    let profiles: Vec<Profile> = match args.profile {
        Some(p) => vec![p.into()],
        None => Profile::ALL.to_vec(),
    };

    if args.json {
        let tables: Vec<_> = profiles
            .iter()
            .flat_map(|profile| {
                profile.projectors(options).into_iter().map(move |p| {
                    json!({
                        "profile": profile.to_string(),
                        "table": p.table_name(),
                        "columns": p.table_columns(),
                    })
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&tables)?);
        return Ok(());
    }

    for profile in profiles {
        println!("{} {}", "Profile:".cyan(), profile.to_string().cyan());
        for projector in profile.projectors(options) {
            let mut builder = Builder::default();
            builder.push_record(["Column", "Type", "Description"]);
            for column in projector.table_columns() {
                builder.push_record([
                    column.name.clone(),
                    column.col_type.to_string(),
                    column.description.clone().unwrap_or_default(),
                ]);
            }
            println!("{}", projector.table_name().bold());
            println!("{}", builder.build().with(Style::rounded()));
        }
    }

    Ok(())
}
