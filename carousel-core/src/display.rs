use crate::models::CarouselItem;

/// Rendering collaborator: turns an item into whatever the front end draws.
///
/// Implementations are free to pool and reuse panels; the carousel asks for
/// one panel per visible item and keeps no reference to it afterwards.
pub trait PanelFactory {
    type Panel;

    fn panel_for(&mut self, item: &CarouselItem) -> Self::Panel;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroupDefinition, Model};

    struct Labels(usize);

    impl PanelFactory for Labels {
        type Panel = String;

        fn panel_for(&mut self, item: &CarouselItem) -> String {
            self.0 += 1;
            item.model.to_string()
        }
    }

    #[test]
    fn test_factory_is_called_per_item() {
        let mut factory = Labels(0);
        let item = CarouselItem::new(0, Model::Group(GroupDefinition::new("★ 2")));
        assert_eq!(factory.panel_for(&item), "group:★ 2");
        assert_eq!(factory.0, 1);
    }
}
