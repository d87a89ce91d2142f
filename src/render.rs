// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! HAL+JSON rendering of wrappers.
//!
//! | Wrapper part             | Document                                      |
//! |--------------------------|-----------------------------------------------|
//! | resource fields          | flattened at the root                         |
//! | links                    | `_links.<rel>`, omitted when there are none   |
//! | single embedded          | `_embedded.<singular>`                        |
//! | embedded list            | `_embedded.<plural>`, possibly `[]`           |
//! | absent embedded          | no `_embedded`                                |
//! | list items               | `_embedded.<plural of item type>`             |
//! | page info                | `page`                                        |

use crate::embedded::HalEmbeddedWrapper;
use crate::error::{HalError, Result};
use crate::header::Links;
use crate::list::HalListWrapper;
use crate::relation::RelationResolver;
use crate::resource::{EmbeddedSlot, HalResourceWrapper};
use serde::ser::{Error as _, Serialize, Serializer};
use serde_json::{Map, Value};
use std::any::type_name;

/// Media type of rendered documents.
pub const MEDIA_TYPE: &str = "application/hal+json";

const LINKS: &str = "_links";
const EMBEDDED: &str = "_embedded";
const PAGE: &str = "page";

/// A wrapper that renders into a HAL document.
pub trait HalDocument {
    fn to_document(&self, resolver: &RelationResolver) -> Result<Map<String, Value>>;
}

/// Resource fields as the root of a document. `_links` and `_embedded` are
/// reserved.
fn flatten<T: Serialize>(resource: &T, type_name: &str) -> Result<Map<String, Value>> {
    let fields = match serde_json::to_value(resource)? {
        Value::Object(fields) => fields,
        _ => bail!(HalError::NonObjectResource(type_name.into())),
    };

    for reserved in &[LINKS, EMBEDDED] {
        ensure!(
            !fields.contains_key(*reserved),
            HalError::ReservedProperty(type_name.into(), reserved.to_string())
        );
    }

    Ok(fields)
}

fn insert_links(document: &mut Map<String, Value>, links: &Links) -> Result<()> {
    if !links.is_empty() {
        document.insert(LINKS.into(), serde_json::to_value(links)?);
    }
    Ok(())
}

fn embed(document: &mut Map<String, Value>, name: &str, value: Value) {
    let mut embedded = Map::new();
    embedded.insert(name.into(), value);
    document.insert(EMBEDDED.into(), Value::Object(embedded));
}

impl<E: Serialize> HalDocument for HalEmbeddedWrapper<E> {
    fn to_document(&self, _resolver: &RelationResolver) -> Result<Map<String, Value>> {
        let mut document = flatten(self.resource(), type_name::<E>())?;
        insert_links(&mut document, self.links())?;
        Ok(document)
    }
}

impl<R: Serialize, E: Serialize + 'static> HalDocument for HalResourceWrapper<R, E> {
    fn to_document(&self, resolver: &RelationResolver) -> Result<Map<String, Value>> {
        let mut document = flatten(self.resource(), type_name::<R>())?;
        insert_links(&mut document, self.links())?;

        match self.embedded() {
            EmbeddedSlot::Absent => (),

            EmbeddedSlot::Single(embedded) => {
                let name = resolver.resolve_of::<E>()?;
                let value = Value::Object(embedded.to_document(resolver)?);
                embed(&mut document, name.singular(), value);
            }

            EmbeddedSlot::List(items) => {
                let name = resolver.resolve_of::<E>()?;
                let values = items
                    .iter()
                    .map(|item| item.to_document(resolver).map(Value::Object))
                    .collect::<Result<Vec<_>>>()?;
                embed(&mut document, name.plural(), Value::Array(values));
            }
        }

        Ok(document)
    }
}

impl<R: Serialize, E: Serialize + 'static> HalDocument for HalListWrapper<R, E> {
    fn to_document(&self, resolver: &RelationResolver) -> Result<Map<String, Value>> {
        let name = resolver.resolve(self.type_hint())?;
        let items = self
            .items()
            .iter()
            .map(|item| item.to_document(resolver).map(Value::Object))
            .collect::<Result<Vec<_>>>()?;

        let mut document = Map::new();
        embed(&mut document, name.plural(), Value::Array(items));
        insert_links(&mut document, self.links())?;

        if let Some(page_info) = self.page_info() {
            document.insert(PAGE.into(), serde_json::to_value(page_info)?);
        }

        Ok(document)
    }
}

/// Renders wrappers with a fixed set of relation names.
///
/// ```
/// use halwrap::link::Link;
/// use halwrap::render::HalRenderer;
/// use halwrap::resource::HalResourceWrapper;
/// use serde_json::json;
///
/// let wrapper = HalResourceWrapper::wrap(json!({ "id": 1 }))
///     .with_links(vec![Link::as_self_of("/orders/1")])
///     .unwrap();
///
/// let document = HalRenderer::default().to_value(&wrapper).unwrap();
///
/// assert_eq!(document, json!({ "id": 1, "_links": { "self": { "href": "/orders/1" } } }));
/// ```
#[derive(Clone, Debug, Default)]
pub struct HalRenderer {
    resolver: RelationResolver,
}

impl HalRenderer {
    pub fn new(resolver: RelationResolver) -> HalRenderer {
        HalRenderer { resolver }
    }

    pub fn resolver(&self) -> &RelationResolver {
        &self.resolver
    }

    pub fn to_value<D: HalDocument>(&self, document: &D) -> Result<Value> {
        let rendered = document.to_document(&self.resolver)?;

        tracing::debug!(
            document = %type_name::<D>(),
            keys = rendered.len(),
            "rendered hal document"
        );

        Ok(Value::Object(rendered))
    }

    pub fn to_string<D: HalDocument>(&self, document: &D) -> Result<String> {
        Ok(serde_json::to_string(&self.to_value(document)?)?)
    }

    /// A `Serialize` view of `document`, for handing to any serializer.
    pub fn rendered<'a, D: HalDocument>(&'a self, document: &'a D) -> Rendered<'a, D> {
        Rendered {
            renderer: self,
            document,
        }
    }
}

pub struct Rendered<'a, D> {
    renderer: &'a HalRenderer,
    document: &'a D,
}

impl<'a, D: HalDocument> Serialize for Rendered<'a, D> {
    fn serialize<S: Serializer>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error> {
        self.renderer
            .to_value(self.document)
            .map_err(S::Error::custom)?
            .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::link::Link;
    use crate::pagination::{HalPageInfo, SortCriteria};
    use crate::relation::{RelationName, TypeHint};
    use serde::Serialize;
    use serde_json::json;

    #[derive(Clone, Debug, Serialize)]
    struct Order {
        id: u32,
        total: f64,
    }

    #[derive(Clone, Debug, Serialize)]
    struct ShipmentDto {
        tracking: String,
    }

    fn order(id: u32) -> HalResourceWrapper<Order> {
        HalResourceWrapper::wrap(Order { id, total: 9.5 })
            .with_links(vec![Link::as_self_of(format!("/orders/{}", id))])
            .expect("valid links")
    }

    fn shipment(tracking: &str) -> HalEmbeddedWrapper<ShipmentDto> {
        HalEmbeddedWrapper::wrap(ShipmentDto {
            tracking: tracking.into(),
        })
        .with_links(vec![Link::as_self_of(format!("/shipments/{}", tracking))])
        .expect("valid links")
    }

    fn renderer() -> HalRenderer {
        HalRenderer::new(RelationResolver::new().strip_suffix("Dto"))
    }

    #[test]
    fn resource_without_embedded() {
        let actual = renderer().to_value(&order(1)).expect("renders");

        assert_eq!(
            actual,
            json!({
                "id": 1,
                "total": 9.5,
                "_links": { "self": { "href": "/orders/1" } }
            })
        );
    }

    #[test]
    fn resource_without_links() {
        let wrapper = HalResourceWrapper::wrap(Order { id: 1, total: 1.0 });

        let actual = renderer().to_value(&wrapper).expect("renders");

        assert_eq!(actual, json!({ "id": 1, "total": 1.0 }));
    }

    #[test]
    fn single_embedded_uses_singular() {
        let wrapper = order(1).with_embedded_resource(Some(shipment("x1")));

        let actual = renderer().to_value(&wrapper).expect("renders");

        assert_eq!(
            actual,
            json!({
                "id": 1,
                "total": 9.5,
                "_links": { "self": { "href": "/orders/1" } },
                "_embedded": {
                    "shipment": {
                        "tracking": "x1",
                        "_links": { "self": { "href": "/shipments/x1" } }
                    }
                }
            })
        );
    }

    #[test]
    fn embedded_list_uses_plural() {
        let wrapper = order(1).with_embedded_list(vec![shipment("x1"), shipment("x2")]);

        let actual = renderer().to_value(&wrapper).expect("renders");

        assert_eq!(
            actual["_embedded"]["shipments"],
            json!([
                { "tracking": "x1", "_links": { "self": { "href": "/shipments/x1" } } },
                { "tracking": "x2", "_links": { "self": { "href": "/shipments/x2" } } }
            ])
        );
    }

    #[test]
    fn absent_and_empty_list_differ() {
        let absent = order(1).with_embedded_resource::<ShipmentDto>(None);
        let empty = order(1).with_embedded_list::<ShipmentDto>(vec![]);

        let absent = renderer().to_value(&absent).expect("renders");
        let empty = renderer().to_value(&empty).expect("renders");

        assert_ne!(absent, empty);
        assert_eq!(absent.get("_embedded"), None);
        assert_eq!(empty["_embedded"], json!({ "shipments": [] }));
    }

    #[test]
    fn list_of_resources() {
        let list = HalListWrapper::wrap(vec![order(1), order(2)])
            .and_then(|list| list.with_links(vec![Link::as_self_of("/orders")]))
            .expect("valid list");

        let actual = renderer().to_value(&list).expect("renders");

        assert_eq!(
            actual,
            json!({
                "_embedded": {
                    "orders": [
                        { "id": 1, "total": 9.5, "_links": { "self": { "href": "/orders/1" } } },
                        { "id": 2, "total": 9.5, "_links": { "self": { "href": "/orders/2" } } }
                    ]
                },
                "_links": { "self": { "href": "/orders" } }
            })
        );
    }

    #[test]
    fn list_items_with_embedded() {
        let list = HalListWrapper::wrap(vec![
            order(1).with_embedded_resource(Some(shipment("a"))),
            order(2).with_embedded_resource(Some(shipment("b"))),
        ])
        .expect("homogeneous items");

        let actual = renderer().to_value(&list).expect("renders");

        assert_eq!(
            actual["_embedded"]["orders"][1]["_embedded"]["shipment"]["tracking"],
            json!("b")
        );
    }

    #[test]
    fn empty_list_is_named_by_type() {
        let list: HalListWrapper<Order> = HalListWrapper::empty();

        let actual = renderer().to_value(&list).expect("renders");

        assert_eq!(actual, json!({ "_embedded": { "orders": [] } }));
    }

    #[test]
    fn paginated_list() {
        let page = HalPageInfo::assemble(2, 6, 0).unwrap();
        let list = HalListWrapper::wrap(vec![order(1), order(2)])
            .and_then(|list| list.paginate(page, &Link::of("/orders"), &SortCriteria::new()))
            .expect("valid list");

        let actual = renderer().to_value(&list).expect("renders");

        assert_eq!(
            actual["page"],
            json!({ "size": 2, "totalElements": 6, "totalPages": 3, "number": 0 })
        );
        assert_eq!(
            actual["_links"],
            json!({
                "self": { "href": "/orders?page=0&size=2" },
                "next": { "href": "/orders?page=1&size=2" },
                "last": { "href": "/orders?page=2&size=2" }
            })
        );
    }

    #[test]
    fn registered_names() {
        let renderer = HalRenderer::new(
            RelationResolver::new().register::<ShipmentDto>(RelationName::new("parcel", "parcels")),
        );
        let wrapper = order(1).with_embedded_list(vec![shipment("a")]);

        let actual = renderer.to_value(&wrapper).expect("renders");

        assert!(actual["_embedded"].get("parcels").is_some());
    }

    #[test]
    fn type_hint_names_dynamic_list() {
        let list: HalListWrapper<Value> = HalListWrapper::wrap(vec![HalResourceWrapper::wrap(json!({ "sku": "a" }))])
            .expect("valid list")
            .with_type_hint(TypeHint::named("Product"));

        let actual = renderer().to_value(&list).expect("renders");

        assert_eq!(actual, json!({ "_embedded": { "products": [{ "sku": "a" }] } }));
    }

    #[test]
    fn unresolvable_list_name() {
        let list: HalListWrapper<(u8, u8)> = HalListWrapper::empty();

        let err = renderer().to_value(&list).unwrap_err();

        match err.downcast_ref::<HalError>() {
            Some(HalError::UnresolvableRelationName(_)) => (),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn reserved_property() {
        #[derive(Serialize)]
        struct Envelope {
            #[serde(rename = "_embedded")]
            inner: u8,
        }

        let wrapper = HalResourceWrapper::wrap(Envelope { inner: 1 });

        let err = renderer().to_value(&wrapper).unwrap_err();

        match err.downcast_ref::<HalError>() {
            Some(HalError::ReservedProperty(_, property)) => assert_eq!(property, "_embedded"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn page_field_is_not_reserved() {
        let wrapper = HalResourceWrapper::wrap(json!({ "page": 3 }));

        let actual = renderer().to_value(&wrapper).expect("renders");

        assert_eq!(actual, json!({ "page": 3 }));
    }

    #[test]
    fn non_object_resource() {
        let wrapper = HalResourceWrapper::wrap(42u32);

        let err = renderer().to_value(&wrapper).unwrap_err();

        assert_eq!(
            err.downcast_ref::<HalError>(),
            Some(&HalError::NonObjectResource("u32".into()))
        );
    }

    #[test]
    fn rendered_is_serialize() {
        let renderer = renderer();
        let wrapper = order(3);

        let actual = serde_json::to_value(renderer.rendered(&wrapper)).expect("serializes");

        assert_eq!(actual, renderer.to_value(&wrapper).expect("renders"));
    }

    #[test]
    fn to_string() {
        let wrapper = HalResourceWrapper::wrap(json!({ "id": 1 }));

        let actual = renderer().to_string(&wrapper).expect("renders");

        assert_eq!(actual, r#"{"id":1}"#);
    }
}
