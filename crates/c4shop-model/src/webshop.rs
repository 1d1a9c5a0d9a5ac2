//! The WebShop software system, its containers and the views drawn of it.

use c4shop_core::{
    tags, ElementId, ElementKind, Location, Model, ModelError, PaperSize, Shape, ViewSet,
};

use crate::personas::Personas;

pub const WEB_APP_TAG: &str = "WebApp";
pub const DATABASE_TAG: &str = "Database";

pub const CONTEXT_VIEW_KEY: &str = "SystemContext";
pub const CONTAINER_VIEW_KEY: &str = "Containers";

#[derive(Debug, Clone, Copy)]
pub struct WebShop {
    web_shop: ElementId,
    payment_gateway: ElementId,
    email_system: ElementId,
    web_application: ElementId,
    api_backend: ElementId,
    database: ElementId,
    personas: Personas,
}

impl WebShop {
    /// Add the systems, containers and relationships to `model`.
    ///
    /// Relationships are inserted in a fixed order so exports are
    /// reproducible. Fails if either persona is missing from `model`.
    pub fn assemble(model: &mut Model, personas: Personas) -> Result<Self, ModelError> {
        for persona in [personas.admin(), personas.customer()] {
            match model.element(persona) {
                Some(e) if e.kind == ElementKind::Person => {}
                Some(e) => {
                    return Err(ModelError::Inconsistent(format!(
                        "{} '{}' is not a person",
                        e.kind, e.name
                    )));
                }
                None => return Err(ModelError::UnknownElement(persona)),
            }
        }

        let web_shop = model.add_software_system(
            Location::Internal,
            "WebShop",
            "Sistema de e-commerce para venda de produtos online",
        );
        let payment_gateway = model.add_software_system(
            Location::External,
            "Payment Gateway",
            "Sistema de pagamento externo (ex: Stripe, PayPal)",
        );
        let email_system = model.add_software_system(
            Location::External,
            "Email System",
            "Sistema de envio de emails transacionais",
        );

        let web_application = model.add_container(
            web_shop,
            "Web Application",
            "Interface web para clientes e administradores",
            "React/TypeScript",
        )?;
        model.add_tags(web_application, &[WEB_APP_TAG])?;
        let api_backend = model.add_container(
            web_shop,
            "API Backend",
            "Fornece funcionalidades via REST API",
            "Spring Boot",
        )?;
        let database = model.add_container(
            web_shop,
            "Database",
            "Armazena produtos, pedidos e usuários",
            "PostgreSQL",
        )?;
        model.add_tags(database, &[DATABASE_TAG])?;

        model.add_relationship(
            personas.customer(),
            web_application,
            "Navega, busca e compra produtos",
            "HTTPS",
        )?;
        model.add_relationship(
            personas.admin(),
            web_application,
            "Gerencia produtos e visualiza pedidos",
            "HTTPS",
        )?;
        model.add_relationship(web_application, api_backend, "Faz requisições para", "REST/HTTPS")?;
        model.add_relationship(api_backend, database, "Lê e escreve dados", "JDBC")?;
        model.add_relationship(api_backend, payment_gateway, "Processa pagamentos", "REST/HTTPS")?;
        model.add_relationship(
            api_backend,
            email_system,
            "Envia confirmações e notificações",
            "SMTP",
        )?;
        // Asynchronous callback, distinct from the synchronous call above.
        model.add_relationship(
            payment_gateway,
            api_backend,
            "Envia callback de status do pagamento",
            "Webhook/HTTPS",
        )?;

        tracing::info!(
            elements = model.elements().count(),
            relationships = model.relationships().count(),
            "webshop model assembled"
        );

        Ok(Self {
            web_shop,
            payment_gateway,
            email_system,
            web_application,
            api_backend,
            database,
            personas,
        })
    }

    /// Derive the context and container views and register the styles.
    pub fn create_views(&self, model: &Model, views: &mut ViewSet) -> Result<(), ModelError> {
        let context = views.create_system_context_view(
            model,
            self.web_shop,
            CONTEXT_VIEW_KEY,
            "Diagrama de Contexto do Sistema WebShop",
        )?;
        context.add_all_software_systems(model)?;
        context.add_all_people(model)?;
        context.set_paper_size(PaperSize::A4Landscape);

        let containers = views.create_container_view(
            model,
            self.web_shop,
            CONTAINER_VIEW_KEY,
            "Diagrama de Containers do Sistema WebShop",
        )?;
        containers.add_all_containers(model)?;
        containers.add(model, self.personas.customer())?;
        containers.add(model, self.personas.admin())?;
        // External systems are not containers, so they must be added by hand.
        containers.add(model, self.payment_gateway)?;
        containers.add(model, self.email_system)?;
        containers.set_paper_size(PaperSize::A4Landscape);
        containers.add_all_influencers(model)?;

        let styles = views.styles_mut();
        styles
            .add_element_style(tags::PERSON)
            .background("#08427b")
            .color("#ffffff")
            .shape(Shape::Person);
        styles
            .add_element_style(tags::SOFTWARE_SYSTEM)
            .background("#1168bd")
            .color("#ffffff");
        styles
            .add_element_style(tags::CONTAINER)
            .background("#438dd5")
            .color("#ffffff");
        styles
            .add_element_style(WEB_APP_TAG)
            .background("#85bbf0")
            .color("#000000")
            .shape(Shape::WebBrowser);
        styles
            .add_element_style(DATABASE_TAG)
            .background("#438dd5")
            .color("#ffffff")
            .shape(Shape::Cylinder);
        styles
            .add_relationship_style(tags::RELATIONSHIP)
            .thickness(2)
            .font_size(24);

        tracing::debug!("webshop views created");
        Ok(())
    }

    pub fn web_shop(&self) -> ElementId {
        self.web_shop
    }

    pub fn payment_gateway(&self) -> ElementId {
        self.payment_gateway
    }

    pub fn email_system(&self) -> ElementId {
        self.email_system
    }

    pub fn web_application(&self) -> ElementId {
        self.web_application
    }

    pub fn api_backend(&self) -> ElementId {
        self.api_backend
    }

    pub fn database(&self) -> ElementId {
        self.database
    }

    pub fn personas(&self) -> Personas {
        self.personas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn personas_from_another_model_are_rejected() {
        let mut other = Model::new();
        let personas = Personas::initialize(&mut other);

        let mut model = Model::new();
        assert!(matches!(
            WebShop::assemble(&mut model, personas),
            Err(ModelError::UnknownElement(_))
        ));
        assert_eq!(model.elements().count(), 0);
    }

    #[test]
    fn handles_that_are_not_persons_are_rejected() {
        let mut model = Model::new();
        model.add_software_system(Location::Internal, "Decoy", "");
        model.add_software_system(Location::Internal, "Decoy", "");
        let mut other = Model::new();
        let personas = Personas::initialize(&mut other);

        assert!(matches!(
            WebShop::assemble(&mut model, personas),
            Err(ModelError::Inconsistent(_))
        ));
    }

    #[test]
    fn views_cannot_be_created_twice() {
        let mut model = Model::new();
        let personas = Personas::initialize(&mut model);
        let shop = WebShop::assemble(&mut model, personas).unwrap();
        let mut views = ViewSet::new();
        shop.create_views(&model, &mut views).unwrap();
        assert_eq!(
            shop.create_views(&model, &mut views),
            Err(ModelError::DuplicateViewKey(CONTEXT_VIEW_KEY.into()))
        );
    }
}
