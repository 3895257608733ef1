use vigil_core::entities::Product;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::{ProductCommands, ProductCreateArgs, ProductUpdateArgs};
use crate::commands::shared::parse::{parse_date, parse_decimal};
use crate::context::AppContext;

/// Handle `vigil product`.
pub async fn handle(
    action: &ProductCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        ProductCommands::Create(args) => super::create(&build(args)?, ctx, flags).await,
        ProductCommands::Update(args) => {
            super::update::<Product, _>(args.id, |product| apply(product, args), ctx, flags).await
        }
        ProductCommands::Delete { id } => super::delete::<Product>(*id, ctx, flags).await,
        ProductCommands::List => super::list::<Product>(ctx, flags).await,
        ProductCommands::Get { id } => super::get::<Product>(*id, ctx, flags).await,
    }
}

fn build(args: &ProductCreateArgs) -> anyhow::Result<Product> {
    let mut product = Product {
        name: args.name.clone(),
        slug: args.slug.clone(),
        price: parse_decimal(&args.price, "price")?,
        category_id: args.category,
        brand_id: args.brand,
        description: args.description.clone().unwrap_or_default(),
        active: !args.inactive,
        ..Product::default()
    };
    if let Some(raw) = &args.manufactured_on {
        product.manufactured_on = parse_date(raw, "manufactured-on")?;
    }
    if let Some(raw) = &args.expires_on {
        product.expires_on = parse_date(raw, "expires-on")?;
    }
    Ok(product)
}

fn apply(product: &mut Product, args: &ProductUpdateArgs) -> anyhow::Result<()> {
    if let Some(name) = &args.name {
        product.name.clone_from(name);
    }
    if let Some(slug) = &args.slug {
        product.slug.clone_from(slug);
    }
    if let Some(raw) = &args.price {
        product.price = parse_decimal(raw, "price")?;
    }
    if let Some(category) = args.category {
        product.category_id = category;
    }
    if let Some(brand) = args.brand {
        product.brand_id = brand;
    }
    if let Some(description) = &args.description {
        product.description.clone_from(description);
    }
    if let Some(raw) = &args.manufactured_on {
        product.manufactured_on = parse_date(raw, "manufactured-on")?;
    }
    if let Some(raw) = &args.expires_on {
        product.expires_on = parse_date(raw, "expires-on")?;
    }
    if let Some(active) = args.active {
        product.active = active;
    }
    Ok(())
}
