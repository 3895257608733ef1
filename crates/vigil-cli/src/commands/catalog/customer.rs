use vigil_core::entities::Customer;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CustomerCommands;
use crate::context::AppContext;

/// Handle `vigil customer`.
pub async fn handle(
    action: &CustomerCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CustomerCommands::Create {
            name,
            email,
            tax_id,
        } => {
            let mut customer = Customer::new(name, email);
            customer.tax_id.clone_from(tax_id);
            super::create(&customer, ctx, flags).await
        }
        CustomerCommands::Update {
            id,
            name,
            email,
            tax_id,
            clear_tax_id,
            active,
        } => {
            let apply = |customer: &mut Customer| {
                if let Some(name) = name {
                    customer.name.clone_from(name);
                }
                if let Some(email) = email {
                    customer.email.clone_from(email);
                }
                if *clear_tax_id {
                    customer.tax_id = None;
                } else if tax_id.is_some() {
                    customer.tax_id.clone_from(tax_id);
                }
                if let Some(active) = active {
                    customer.active = *active;
                }
                anyhow::Ok(())
            };
            super::update(*id, apply, ctx, flags).await
        }
        CustomerCommands::Delete { id } => super::delete::<Customer>(*id, ctx, flags).await,
        CustomerCommands::List => super::list::<Customer>(ctx, flags).await,
        CustomerCommands::Get { id } => super::get::<Customer>(*id, ctx, flags).await,
    }
}
