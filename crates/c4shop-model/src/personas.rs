use c4shop_core::{tags, ElementId, Location, Model};

/// The human actors of the shop.
///
/// The handles only exist once [`Personas::initialize`] has run, so there is
/// no way to ask for a persona that was never created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Personas {
    admin: ElementId,
    customer: ElementId,
}

impl Personas {
    /// Add Admin (internal) and Customer (external) to `model`.
    ///
    /// Not idempotent: calling this twice on one model adds four persons.
    pub fn initialize(model: &mut Model) -> Self {
        let admin = model.add_person(
            Location::Internal,
            "Admin",
            "Administrador do sistema responsável por gerenciar produtos, visualizar pedidos e gerar relatórios",
        );
        model[admin].add_tags(&[tags::PERSON]);

        let customer = model.add_person(
            Location::External,
            "Customer",
            "Cliente que acessa a loja virtual para navegar, buscar produtos e realizar compras online",
        );
        model[customer].add_tags(&[tags::PERSON]);

        Self { admin, customer }
    }

    pub fn admin(&self) -> ElementId {
        self.admin
    }

    pub fn customer(&self) -> ElementId {
        self.customer
    }
}
