// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! Assemblers build wrappers from domain values and link callbacks.
//!
//! An assembler implements the callback trait ([`FlatHalWrapperAssembler`]
//! or [`EmbeddingHalWrapperAssembler`]); the wrapping operations come from
//! the blanket-implemented `...Ext` traits and cannot be replaced.

use crate::embedded::HalEmbeddedWrapper;
use crate::error::Result;
use crate::link::Link;
use crate::list::HalListWrapper;
use crate::pagination::{HalPageInfo, SortCriteria};
use crate::param::ListStyle;
use crate::relation::TypeHint;
use crate::resource::HalResourceWrapper;
use crate::uri::BaseUrl;

/// Per-request data handed to every assembler operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestContext {
    base_url: Option<BaseUrl>,
    list_style: ListStyle,
}

impl RequestContext {
    pub fn new() -> RequestContext {
        RequestContext::default()
    }

    /// Relative links built by callbacks get prefixed with `base_url`.
    pub fn with_base_url(base_url: BaseUrl) -> RequestContext {
        RequestContext {
            base_url: Some(base_url),
            ..RequestContext::default()
        }
    }

    /// Sets how callbacks render exploded list parameters, as used by
    /// `RouteRef::to_link_in`.
    pub fn with_list_style(self, list_style: ListStyle) -> RequestContext {
        RequestContext { list_style, ..self }
    }

    pub fn base_url(&self) -> Option<&BaseUrl> {
        self.base_url.as_ref()
    }

    pub fn list_style(&self) -> ListStyle {
        self.list_style
    }

    fn finish(&self, links: Vec<Link>) -> Vec<Link> {
        match &self.base_url {
            Some(base) => links
                .into_iter()
                .map(|link| link.prepend_base_url(base))
                .collect(),
            None => links,
        }
    }

    fn finish_one(&self, link: Link) -> Link {
        match &self.base_url {
            Some(base) => link.prepend_base_url(base),
            None => link,
        }
    }
}

fn with_first(first: Link, mut others: Vec<Link>) -> Vec<Link> {
    others.insert(0, first);
    others
}

/// Link callbacks for wrapping `R` without embedded resources.
pub trait FlatHalWrapperAssembler<R: 'static> {
    /// Names the list when it has no items.
    fn resource_type_hint(&self) -> TypeHint {
        TypeHint::of::<R>()
    }

    fn build_self_link_for_resource(&self, resource: &R, context: &RequestContext) -> Result<Link>;

    /// The list's self link, also the base of its navigation links.
    fn build_self_link_for_resource_list(&self, context: &RequestContext) -> Result<Link>;

    fn build_other_links_for_resource(&self, _resource: &R, _context: &RequestContext) -> Result<Vec<Link>> {
        Ok(vec![])
    }

    fn build_other_links_for_resource_list(
        &self,
        _resources: &[&R],
        _context: &RequestContext,
    ) -> Result<Vec<Link>> {
        Ok(vec![])
    }
}

/// Wrapping operations of every [`FlatHalWrapperAssembler`].
pub trait FlatHalWrapperAssemblerExt<R: 'static>: FlatHalWrapperAssembler<R> {
    fn wrap_in_resource_wrapper(&self, resource: R, context: &RequestContext) -> Result<HalResourceWrapper<R>> {
        let self_link = self.build_self_link_for_resource(&resource, context)?;
        let others = self.build_other_links_for_resource(&resource, context)?;

        HalResourceWrapper::wrap(resource).with_links(context.finish(with_first(self_link, others)))
    }

    fn wrap_in_list_wrapper(&self, resources: Vec<R>, context: &RequestContext) -> Result<HalListWrapper<R>> {
        let self_link = self.build_self_link_for_resource_list(context)?;
        let others = self.build_other_links_for_resource_list(&resources.iter().collect::<Vec<_>>(), context)?;

        let list = flat_list(self, resources, context)?;
        tracing::debug!(items = list.len(), "assembled list wrapper");

        list.with_links(context.finish(with_first(self_link, others)))
    }

    /// Wraps one page of resources; the list self link is the base of the
    /// derived navigation links.
    fn wrap_in_paged_list_wrapper(
        &self,
        resources: Vec<R>,
        page: HalPageInfo,
        sort: &SortCriteria,
        context: &RequestContext,
    ) -> Result<HalListWrapper<R>> {
        let base = context.finish_one(self.build_self_link_for_resource_list(context)?);
        let others = self.build_other_links_for_resource_list(&resources.iter().collect::<Vec<_>>(), context)?;

        let list = flat_list(self, resources, context)?;
        tracing::debug!(
            items = list.len(),
            page = page.current_page_number(),
            "assembled paged list wrapper"
        );

        list.paginate(page, &base, sort)?.with_links(context.finish(others))
    }

    fn create_empty_list_wrapper(&self, context: &RequestContext) -> Result<HalListWrapper<R>> {
        self.wrap_in_list_wrapper(vec![], context)
    }
}

impl<R: 'static, A: FlatHalWrapperAssembler<R> + ?Sized> FlatHalWrapperAssemblerExt<R> for A {}

fn flat_list<R, A>(assembler: &A, resources: Vec<R>, context: &RequestContext) -> Result<HalListWrapper<R>>
where
    R: 'static,
    A: FlatHalWrapperAssembler<R> + ?Sized,
{
    let items = resources
        .into_iter()
        .map(|resource| FlatHalWrapperAssemblerExt::wrap_in_resource_wrapper(assembler, resource, context))
        .collect::<Result<Vec<_>>>()?;

    Ok(HalListWrapper::wrap(items)?.with_type_hint(assembler.resource_type_hint()))
}

/// Link callbacks for wrapping `R` with embedded `E`.
pub trait EmbeddingHalWrapperAssembler<R: 'static, E: 'static> {
    fn resource_type_hint(&self) -> TypeHint {
        TypeHint::of::<R>()
    }

    fn build_self_link_for_resource(&self, resource: &R, context: &RequestContext) -> Result<Link>;

    fn build_self_link_for_embedded(&self, embedded: &E, context: &RequestContext) -> Result<Link>;

    fn build_self_link_for_resource_list(&self, context: &RequestContext) -> Result<Link>;

    fn build_other_links_for_resource(&self, _resource: &R, _context: &RequestContext) -> Result<Vec<Link>> {
        Ok(vec![])
    }

    fn build_other_links_for_embedded(&self, _embedded: &E, _context: &RequestContext) -> Result<Vec<Link>> {
        Ok(vec![])
    }

    fn build_other_links_for_resource_list(
        &self,
        _resources: &[&R],
        _context: &RequestContext,
    ) -> Result<Vec<Link>> {
        Ok(vec![])
    }
}

/// Wrapping operations of every [`EmbeddingHalWrapperAssembler`].
pub trait EmbeddingHalWrapperAssemblerExt<R: 'static, E: 'static>: EmbeddingHalWrapperAssembler<R, E> {
    fn wrap_in_embedded_wrapper(&self, embedded: E, context: &RequestContext) -> Result<HalEmbeddedWrapper<E>> {
        let self_link = self.build_self_link_for_embedded(&embedded, context)?;
        let others = self.build_other_links_for_embedded(&embedded, context)?;

        HalEmbeddedWrapper::wrap(embedded).with_links(context.finish(with_first(self_link, others)))
    }

    /// Wraps `resource` with a single embedded value; `None` leaves the
    /// embedded slot absent.
    fn wrap_in_resource_wrapper(
        &self,
        resource: R,
        embedded: Option<E>,
        context: &RequestContext,
    ) -> Result<HalResourceWrapper<R, E>> {
        let embedded = match embedded {
            Some(embedded) => Some(self.wrap_in_embedded_wrapper(embedded, context)?),
            None => None,
        };

        Ok(main_wrapper::<R, E, Self>(self, resource, context)?.with_embedded_resource(embedded))
    }

    /// Wraps `resource` with an embedded list, kept even when empty.
    fn wrap_in_resource_wrapper_with_list(
        &self,
        resource: R,
        embedded: Vec<E>,
        context: &RequestContext,
    ) -> Result<HalResourceWrapper<R, E>> {
        let embedded = embedded
            .into_iter()
            .map(|item| self.wrap_in_embedded_wrapper(item, context))
            .collect::<Result<Vec<_>>>()?;

        Ok(main_wrapper::<R, E, Self>(self, resource, context)?.with_embedded_list(embedded))
    }

    fn wrap_in_list_wrapper(&self, pairs: Vec<(R, E)>, context: &RequestContext) -> Result<HalListWrapper<R, E>> {
        let items = pairs
            .into_iter()
            .map(|(resource, embedded)| self.wrap_in_resource_wrapper(resource, Some(embedded), context))
            .collect::<Result<Vec<_>>>()?;

        embedding_list(self, items, context)
    }

    fn wrap_in_list_wrapper_with_lists(
        &self,
        pairs: Vec<(R, Vec<E>)>,
        context: &RequestContext,
    ) -> Result<HalListWrapper<R, E>> {
        let items = pairs
            .into_iter()
            .map(|(resource, embedded)| self.wrap_in_resource_wrapper_with_list(resource, embedded, context))
            .collect::<Result<Vec<_>>>()?;

        embedding_list(self, items, context)
    }

    fn wrap_in_paged_list_wrapper(
        &self,
        pairs: Vec<(R, E)>,
        page: HalPageInfo,
        sort: &SortCriteria,
        context: &RequestContext,
    ) -> Result<HalListWrapper<R, E>> {
        let base = context.finish_one(self.build_self_link_for_resource_list(context)?);
        let items = pairs
            .into_iter()
            .map(|(resource, embedded)| self.wrap_in_resource_wrapper(resource, Some(embedded), context))
            .collect::<Result<Vec<_>>>()?;
        let resources: Vec<&R> = items.iter().map(HalResourceWrapper::resource).collect();
        let others = self.build_other_links_for_resource_list(&resources, context)?;

        HalListWrapper::wrap(items)?
            .with_type_hint(self.resource_type_hint())
            .paginate(page, &base, sort)?
            .with_links(context.finish(others))
    }

    fn create_empty_list_wrapper(&self, context: &RequestContext) -> Result<HalListWrapper<R, E>> {
        embedding_list(self, vec![], context)
    }
}

impl<R: 'static, E: 'static, A: EmbeddingHalWrapperAssembler<R, E> + ?Sized> EmbeddingHalWrapperAssemblerExt<R, E>
    for A
{
}

fn main_wrapper<R, E, A>(assembler: &A, resource: R, context: &RequestContext) -> Result<HalResourceWrapper<R>>
where
    R: 'static,
    E: 'static,
    A: EmbeddingHalWrapperAssembler<R, E> + ?Sized,
{
    let self_link = assembler.build_self_link_for_resource(&resource, context)?;
    let others = assembler.build_other_links_for_resource(&resource, context)?;

    HalResourceWrapper::wrap(resource).with_links(context.finish(with_first(self_link, others)))
}

fn embedding_list<R, E, A>(
    assembler: &A,
    items: Vec<HalResourceWrapper<R, E>>,
    context: &RequestContext,
) -> Result<HalListWrapper<R, E>>
where
    R: 'static,
    E: 'static,
    A: EmbeddingHalWrapperAssembler<R, E> + ?Sized,
{
    let self_link = assembler.build_self_link_for_resource_list(context)?;
    let resources: Vec<&R> = items.iter().map(HalResourceWrapper::resource).collect();
    let others = assembler.build_other_links_for_resource_list(&resources, context)?;

    tracing::debug!(items = items.len(), "assembled embedding list wrapper");

    HalListWrapper::wrap(items)?
        .with_type_hint(assembler.resource_type_hint())
        .with_links(context.finish(with_first(self_link, others)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HalError;
    use crate::param::Bindings;
    use crate::render::HalRenderer;
    use crate::resource::EmbeddedShape;
    use serde::Serialize;
    use serde_json::json;

    #[derive(Clone, Debug, PartialEq, Serialize)]
    struct Order {
        id: u64,
    }

    #[derive(Clone, Debug, PartialEq, Serialize)]
    struct Shipment {
        id: u64,
    }

    struct OrderAssembler;

    impl FlatHalWrapperAssembler<Order> for OrderAssembler {
        fn build_self_link_for_resource(&self, order: &Order, _context: &RequestContext) -> Result<Link> {
            Link::as_self_of("/orders/{id}").expand(&Bindings::new().with("id", order.id))
        }

        fn build_self_link_for_resource_list(&self, _context: &RequestContext) -> Result<Link> {
            Ok(Link::as_self_of("/orders"))
        }

        fn build_other_links_for_resource(&self, order: &Order, _context: &RequestContext) -> Result<Vec<Link>> {
            Ok(vec![Link::of("/orders")
                .slash(&order.id.to_string())
                .slash("items")
                .with_rel("items")])
        }

        fn build_other_links_for_resource_list(
            &self,
            orders: &[&Order],
            _context: &RequestContext,
        ) -> Result<Vec<Link>> {
            if orders.is_empty() {
                return Ok(vec![]);
            }
            Ok(vec![Link::of("/orders/export").with_rel("export")])
        }
    }

    struct OrderShipmentAssembler;

    impl EmbeddingHalWrapperAssembler<Order, Shipment> for OrderShipmentAssembler {
        fn build_self_link_for_resource(&self, order: &Order, _context: &RequestContext) -> Result<Link> {
            Ok(Link::as_self_of(format!("/orders/{}", order.id)))
        }

        fn build_self_link_for_embedded(&self, shipment: &Shipment, _context: &RequestContext) -> Result<Link> {
            Ok(Link::as_self_of(format!("/shipments/{}", shipment.id)))
        }

        fn build_self_link_for_resource_list(&self, _context: &RequestContext) -> Result<Link> {
            Ok(Link::as_self_of("/orders"))
        }
    }

    struct BrokenAssembler;

    impl FlatHalWrapperAssembler<Order> for BrokenAssembler {
        fn build_self_link_for_resource(&self, _order: &Order, _context: &RequestContext) -> Result<Link> {
            Link::as_self_of("/orders/{id}").expand(&Bindings::new())
        }

        fn build_self_link_for_resource_list(&self, _context: &RequestContext) -> Result<Link> {
            Ok(Link::as_self_of("/orders"))
        }

        fn build_other_links_for_resource(&self, _order: &Order, _context: &RequestContext) -> Result<Vec<Link>> {
            Ok(vec![Link::as_self_of("/duplicate")])
        }
    }

    mod flat {
        use super::*;

        #[test]
        fn resource_links() {
            let wrapper = OrderAssembler
                .wrap_in_resource_wrapper(Order { id: 4 }, &RequestContext::new())
                .expect("valid wrapper");

            assert_eq!(wrapper.links().rels(), vec!["self", "items"]);
            assert_eq!(wrapper.links().get("items").map(Link::href), Some("/orders/4/items"));
            assert_eq!(wrapper.embedded_shape(), EmbeddedShape::Absent);
        }

        #[test]
        fn base_url_is_prepended() {
            let context = RequestContext::with_base_url(BaseUrl::new("https", "shop.example", None));

            let wrapper = OrderAssembler
                .wrap_in_resource_wrapper(Order { id: 4 }, &context)
                .expect("valid wrapper");

            assert_eq!(
                wrapper.links().get("self").map(Link::href),
                Some("https://shop.example/orders/4")
            );
        }

        #[test]
        fn list_keeps_order() {
            let list = OrderAssembler
                .wrap_in_list_wrapper(vec![Order { id: 3 }, Order { id: 1 }, Order { id: 2 }], &RequestContext::new())
                .expect("valid list");

            let actual: Vec<u64> = list.items().iter().map(|item| item.resource().id).collect();

            assert_eq!(actual, vec![3, 1, 2]);
            assert_eq!(list.links().rels(), vec!["self", "export"]);
        }

        #[test]
        fn empty_list() {
            let list = OrderAssembler
                .create_empty_list_wrapper(&RequestContext::new())
                .expect("valid list");

            let actual = HalRenderer::default().to_value(&list).expect("renders");

            assert_eq!(
                actual,
                json!({
                    "_embedded": { "orders": [] },
                    "_links": { "self": { "href": "/orders" } }
                })
            );
        }

        #[test]
        fn paged_list() {
            let page = HalPageInfo::assemble(2, 5, 2).unwrap();
            let context = RequestContext::with_base_url(BaseUrl::new("http", "localhost", Some(8080)));

            let list = OrderAssembler
                .wrap_in_paged_list_wrapper(
                    vec![Order { id: 3 }, Order { id: 4 }],
                    page,
                    &SortCriteria::new(),
                    &context,
                )
                .expect("valid list");

            assert_eq!(list.links().rels(), vec!["self", "first", "prev", "next", "last", "export"]);
            assert_eq!(
                list.links().get("next").map(Link::href),
                Some("http://localhost:8080/orders?page=2&size=2")
            );
            assert_eq!(list.page_info(), Some(&page));
        }

        #[test]
        fn callback_errors_propagate() {
            let err = BrokenAssembler
                .wrap_in_resource_wrapper(Order { id: 1 }, &RequestContext::new())
                .unwrap_err();

            assert_eq!(
                err.downcast_ref::<HalError>(),
                Some(&HalError::MissingMandatoryVariable("id".into()))
            );
        }
    }

    mod embedding {
        use super::*;

        #[test]
        fn single_embedded() {
            let wrapper = OrderShipmentAssembler
                .wrap_in_resource_wrapper(Order { id: 1 }, Some(Shipment { id: 9 }), &RequestContext::new())
                .expect("valid wrapper");

            let actual = HalRenderer::default().to_value(&wrapper).expect("renders");

            assert_eq!(
                actual,
                json!({
                    "id": 1,
                    "_links": { "self": { "href": "/orders/1" } },
                    "_embedded": {
                        "shipment": { "id": 9, "_links": { "self": { "href": "/shipments/9" } } }
                    }
                })
            );
        }

        #[test]
        fn no_embedded_value() {
            let wrapper = OrderShipmentAssembler
                .wrap_in_resource_wrapper(Order { id: 1 }, None, &RequestContext::new())
                .expect("valid wrapper");

            assert_eq!(wrapper.embedded_shape(), EmbeddedShape::Absent);
        }

        #[test]
        fn empty_embedded_list() {
            let wrapper = OrderShipmentAssembler
                .wrap_in_resource_wrapper_with_list(Order { id: 1 }, vec![], &RequestContext::new())
                .expect("valid wrapper");

            let actual = HalRenderer::default().to_value(&wrapper).expect("renders");

            assert_eq!(actual["_embedded"], json!({ "shipments": [] }));
        }

        #[test]
        fn list_of_pairs() {
            let list = OrderShipmentAssembler
                .wrap_in_list_wrapper(
                    vec![(Order { id: 1 }, Shipment { id: 10 }), (Order { id: 2 }, Shipment { id: 20 })],
                    &RequestContext::new(),
                )
                .expect("valid list");

            let actual = HalRenderer::default().to_value(&list).expect("renders");

            assert_eq!(actual["_embedded"]["orders"][1]["_embedded"]["shipment"]["id"], json!(20));
            assert_eq!(actual["_links"]["self"]["href"], json!("/orders"));
        }

        #[test]
        fn list_of_lists() {
            let list = OrderShipmentAssembler
                .wrap_in_list_wrapper_with_lists(
                    vec![(Order { id: 1 }, vec![]), (Order { id: 2 }, vec![Shipment { id: 20 }])],
                    &RequestContext::new(),
                )
                .expect("valid list");

            let actual = HalRenderer::default().to_value(&list).expect("renders");

            assert_eq!(actual["_embedded"]["orders"][0]["_embedded"]["shipments"], json!([]));
            assert_eq!(actual["_embedded"]["orders"][1]["_embedded"]["shipments"][0]["id"], json!(20));
        }

        #[test]
        fn paged_pairs() {
            let page = HalPageInfo::assemble(1, 3, 0).unwrap();

            let list = OrderShipmentAssembler
                .wrap_in_paged_list_wrapper(
                    vec![(Order { id: 1 }, Shipment { id: 10 })],
                    page,
                    &SortCriteria::new(),
                    &RequestContext::new(),
                )
                .expect("valid list");

            assert_eq!(list.links().rels(), vec!["self", "next", "last"]);
        }

        #[test]
        fn empty_list() {
            let list = OrderShipmentAssembler
                .create_empty_list_wrapper(&RequestContext::new())
                .expect("valid list");

            assert!(list.is_empty());
            assert_eq!(list.type_hint(), &TypeHint::of::<Order>());
        }
    }
}
