//! Pizza Order Schema Tests
//!
//! End-to-end checks of the schema pipeline through the public API:
//! build -> attach -> resolve -> validate.

#[cfg(test)]
mod pizza_schema_tests {
    use anyhow::Result;
    use nluforge_core::{
        EntityDefinition, EntityNode, Feature, FeatureAttacher, FeatureKind, LabelValidationError,
        LabelValidator, LabeledSpan, PathResolver, SchemaBuilder, SchemaError,
    };

    const TEXT: &str = "I want two small seafood pizzas with extra cheese.";

    fn pizza_order_definition() -> EntityDefinition {
        EntityDefinition::with_children(
            "Pizza order",
            vec![
                EntityDefinition::with_children(
                    "Pizza",
                    vec![
                        EntityDefinition::leaf("Quantity"),
                        EntityDefinition::leaf("Type"),
                        EntityDefinition::leaf("Size"),
                    ],
                ),
                EntityDefinition::with_children(
                    "Toppings",
                    vec![
                        EntityDefinition::leaf("Type"),
                        EntityDefinition::leaf("Quantity"),
                    ],
                ),
            ],
        )
    }

    fn labels(size: LabeledSpan) -> LabeledSpan {
        LabeledSpan::new("Pizza order", 7, 48).with_children(vec![
            LabeledSpan::new("Pizza", 7, 30).with_children(vec![
                LabeledSpan::new("Quantity", 7, 9),
                size,
                LabeledSpan::new("Type", 17, 23),
            ]),
            LabeledSpan::new("Toppings", 37, 48).with_children(vec![
                LabeledSpan::new("Quantity", 37, 41),
                LabeledSpan::new("Type", 43, 48),
            ]),
        ])
    }

    fn enriched_schema() -> Result<EntityNode> {
        let mut root = SchemaBuilder::new().build(&pizza_order_definition())?;
        FeatureAttacher::attach(
            &mut root,
            &["Pizza", "Quantity"],
            Feature::model("number").required(),
        )?;
        FeatureAttacher::attach(&mut root, &["Toppings", "Quantity"], Feature::model("number"))?;
        FeatureAttacher::attach(
            &mut root,
            &["Toppings", "Quantity"],
            Feature::phrase_list("QuantityPhraselist"),
        )?;
        Ok(root)
    }

    #[test]
    fn test_every_node_resolvable_by_full_path() -> Result<()> {
        let root = SchemaBuilder::new().build(&pizza_order_definition())?;
        let paths = root.paths();
        assert_eq!(paths.len(), 8);
        for path in &paths {
            let node = PathResolver::resolve(&root, path.as_slice())?;
            assert_eq!(Some(node), root.find_by_id(node.id()));
        }
        Ok(())
    }

    #[test]
    fn test_toppings_quantity_distinct_from_pizza_quantity() -> Result<()> {
        let root = SchemaBuilder::new().build(&pizza_order_definition())?;
        let toppings = PathResolver::resolve(&root, &["Toppings", "Quantity"])?;
        let pizza = PathResolver::resolve(&root, &["Pizza", "Quantity"])?;
        assert_eq!(toppings.name(), "Quantity");
        assert_ne!(toppings.id(), pizza.id());
        assert_eq!(
            root.path_of(toppings.id()),
            Some(vec!["Toppings".to_string(), "Quantity".to_string()])
        );
        Ok(())
    }

    #[test]
    fn test_features_land_on_the_right_nodes() -> Result<()> {
        let root = enriched_schema()?;
        let pizza_qty = PathResolver::resolve(&root, &["Pizza", "Quantity"])?;
        let topping_qty = PathResolver::resolve(&root, &["Toppings", "Quantity"])?;

        assert_eq!(pizza_qty.features().len(), 1);
        assert_eq!(topping_qty.features().len(), 2);
        assert!(root
            .all_features()
            .all(|f| root.find_by_id(f.target_node_id).is_some()));
        assert!(topping_qty
            .features()
            .iter()
            .any(|f| f.kind == FeatureKind::PhraseList && f.target_node_id == topping_qty.id()));
        Ok(())
    }

    #[test]
    fn test_second_identical_attach_fails() -> Result<()> {
        let mut root = enriched_schema()?;
        let err = FeatureAttacher::attach(
            &mut root,
            &["Toppings", "Quantity"],
            Feature::phrase_list("QuantityPhraselist"),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateFeature { .. }));
        Ok(())
    }

    #[test]
    fn test_duplicate_sibling_definition_fails() {
        let mut def = pizza_order_definition();
        def.children.push(EntityDefinition::leaf("Toppings"));
        assert!(matches!(
            SchemaBuilder::new().build(&def),
            Err(SchemaError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_labeled_example_validates_against_enriched_schema() -> Result<()> {
        let root = enriched_schema()?;
        let example = labels(LabeledSpan::new("Size", 11, 15));
        LabelValidator::validate(&root, TEXT, &example)?;
        // Validation never mutates, a second pass agrees
        LabelValidator::validate(&root, TEXT, &example)?;
        Ok(())
    }

    #[test]
    fn test_overlapping_quantity_and_size_rejected() -> Result<()> {
        let root = enriched_schema()?;
        let example = labels(LabeledSpan::new("Size", 8, 12));
        let err = LabelValidator::validate(&root, TEXT, &example).unwrap_err();
        assert!(matches!(err, LabelValidationError::OverlappingSpan { .. }));
        Ok(())
    }
}
