#[cfg(test)]
mod tests {
    use super::super::*;
    use resource_api_sdk::Resource;
    use serde_json::json;

    #[test]
    fn test_entity_to_resource_conversion() {
        let row = entity::Model {
            id: 12,
            section: "products".to_owned(),
            attributes: r#"{"title":"Kettle","price":10}"#.to_owned(),
        };

        let resource = Resource::try_from(row).unwrap();

        assert_eq!(resource.id.as_str(), "12");
        assert_eq!(resource.attributes["title"], "Kettle");
        assert_eq!(resource.attributes["price"], 10);
    }

    #[test]
    fn test_entity_with_corrupt_attributes() {
        let row = entity::Model {
            id: 3,
            section: "products".to_owned(),
            attributes: "[1,2]".to_owned(),
        };

        let err = Resource::try_from(row).unwrap_err();
        assert!(err.to_string().contains("resource 3"));
    }

    #[test]
    fn test_attributes_encode_decode() {
        let attrs = json!({"title": "Teapot", "tags": ["a", "b"]})
            .as_object()
            .cloned()
            .unwrap();

        let raw = mapper::encode_attributes(&attrs).unwrap();
        assert_eq!(mapper::decode_attributes(&raw).unwrap(), attrs);
    }
}
