use serde::Serialize;
use vigil_core::entities::{Brand, Category};
use vigil_db::repos::Record;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TaxonomyCommands;
use crate::context::AppContext;

/// Categories and brands share one shape.
pub trait Taxonomy: Record + Serialize {
    fn named(name: &str, slug: &str) -> Self;
    fn name_mut(&mut self) -> &mut String;
    fn slug_mut(&mut self) -> &mut String;
    fn description_mut(&mut self) -> &mut String;
    fn active_mut(&mut self) -> &mut bool;
}

macro_rules! impl_taxonomy {
    ($ty:ty) => {
        impl Taxonomy for $ty {
            fn named(name: &str, slug: &str) -> Self {
                Self::new(name, slug)
            }
            fn name_mut(&mut self) -> &mut String {
                &mut self.name
            }
            fn slug_mut(&mut self) -> &mut String {
                &mut self.slug
            }
            fn description_mut(&mut self) -> &mut String {
                &mut self.description
            }
            fn active_mut(&mut self) -> &mut bool {
                &mut self.active
            }
        }
    };
}

impl_taxonomy!(Category);
impl_taxonomy!(Brand);

/// Handle `vigil category` and `vigil brand`.
pub async fn handle<E: Taxonomy>(
    action: &TaxonomyCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TaxonomyCommands::Create {
            name,
            slug,
            description,
            inactive,
        } => {
            let mut entity = E::named(name, slug);
            if let Some(description) = description {
                description.clone_into(entity.description_mut());
            }
            *entity.active_mut() = !inactive;
            super::create(&entity, ctx, flags).await
        }
        TaxonomyCommands::Update {
            id,
            name,
            slug,
            description,
            active,
        } => {
            let apply = |entity: &mut E| {
                if let Some(name) = name {
                    name.clone_into(entity.name_mut());
                }
                if let Some(slug) = slug {
                    slug.clone_into(entity.slug_mut());
                }
                if let Some(description) = description {
                    description.clone_into(entity.description_mut());
                }
                if let Some(active) = active {
                    *entity.active_mut() = *active;
                }
                anyhow::Ok(())
            };
            super::update(*id, apply, ctx, flags).await
        }
        TaxonomyCommands::Delete { id } => super::delete::<E>(*id, ctx, flags).await,
        TaxonomyCommands::List => super::list::<E>(ctx, flags).await,
        TaxonomyCommands::Get { id } => super::get::<E>(*id, ctx, flags).await,
    }
}
