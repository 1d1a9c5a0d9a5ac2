//! The WebShop e-commerce architecture, declared as code.
//!
//! Assembly is a single pass: [`Personas`] first, then [`WebShop`] with the
//! personas handed in, then the views. [`build_workspace`] does all three.

pub mod personas;
pub mod webshop;

use c4shop_core::{ModelError, Workspace};

pub use personas::Personas;
pub use webshop::WebShop;

pub const WORKSPACE_NAME: &str = "WebShop";

pub fn build_workspace() -> Result<Workspace, ModelError> {
    let mut workspace = Workspace::new(
        WORKSPACE_NAME,
        "Modelo de arquitetura do sistema de e-commerce WebShop",
    );
    let personas = Personas::initialize(&mut workspace.model);
    let web_shop = WebShop::assemble(&mut workspace.model, personas)?;
    web_shop.create_views(&workspace.model, &mut workspace.views)?;
    Ok(workspace)
}
