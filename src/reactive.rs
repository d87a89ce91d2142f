// Copyright 2019 Arnau Siches
//
// Licensed under the MIT license <LICENSE or http://opensource.org/licenses/MIT>.
// This file may not be copied, modified, or distributed except
// according to those terms.

//! Assembler operations over lazily produced values.
//!
//! A single value comes from a future resolving to `Result<Option<T>>`, many
//! values from a stream of `Result<T>`. Each producer is polled once. Output
//! order follows production order, and failures of a producer end the
//! operation with that failure. An absent main resource yields `Ok(None)`.

use crate::assembler::{
    EmbeddingHalWrapperAssembler, EmbeddingHalWrapperAssemblerExt, FlatHalWrapperAssembler,
    FlatHalWrapperAssemblerExt, RequestContext,
};
use crate::error::{Error, Result};
use crate::list::HalListWrapper;
use crate::pagination::{HalPageInfo, SortCriteria};
use crate::resource::HalResourceWrapper;
use futures::future::{self, BoxFuture, FutureExt};
use futures::stream::{Stream, StreamExt, TryStreamExt};
use std::future::Future;

/// Lazy wrapping operations of every [`FlatHalWrapperAssembler`].
pub trait ReactiveFlatHalWrapperAssembler<R: Send + 'static>: FlatHalWrapperAssembler<R> + Sync {
    fn wrap_future_in_resource_wrapper<'a, F>(
        &'a self,
        resource: F,
        context: &'a RequestContext,
    ) -> BoxFuture<'a, Result<Option<HalResourceWrapper<R>>>>
    where
        F: Future<Output = Result<Option<R>>> + Send + 'a,
    {
        async move {
            match resource.await? {
                Some(resource) => FlatHalWrapperAssemblerExt::wrap_in_resource_wrapper(self, resource, context)
                    .map(Some),
                None => Ok(None),
            }
        }
        .boxed()
    }

    /// Collects `resources` in order and wraps them; an empty stream gives an
    /// empty list.
    fn wrap_stream_in_list_wrapper<'a, S>(
        &'a self,
        resources: S,
        context: &'a RequestContext,
    ) -> BoxFuture<'a, Result<HalListWrapper<R>>>
    where
        S: Stream<Item = Result<R>> + Send + 'a,
    {
        async move {
            let resources: Vec<R> = resources.try_collect().await?;
            FlatHalWrapperAssemblerExt::wrap_in_list_wrapper(self, resources, context)
        }
        .boxed()
    }

    /// Wraps one page of `resources` once both the page and the total
    /// element count have been produced.
    fn wrap_stream_in_paged_list_wrapper<'a, S, T>(
        &'a self,
        resources: S,
        total_elements: T,
        page_size: u32,
        offset: u64,
        sort: &'a SortCriteria,
        context: &'a RequestContext,
    ) -> BoxFuture<'a, Result<HalListWrapper<R>>>
    where
        S: Stream<Item = Result<R>> + Send + 'a,
        T: Future<Output = Result<u64>> + Send + 'a,
    {
        async move {
            let (resources, total_elements) =
                future::try_join(resources.try_collect::<Vec<R>>(), total_elements).await?;
            let page = HalPageInfo::assemble(page_size, total_elements, offset)?;

            FlatHalWrapperAssemblerExt::wrap_in_paged_list_wrapper(self, resources, page, sort, context)
        }
        .boxed()
    }
}

impl<R, A> ReactiveFlatHalWrapperAssembler<R> for A
where
    R: Send + 'static,
    A: FlatHalWrapperAssembler<R> + Sync + ?Sized,
{
}

/// Lazy wrapping operations of every [`EmbeddingHalWrapperAssembler`].
pub trait ReactiveEmbeddingHalWrapperAssembler<R: Send + 'static, E: Send + 'static>:
    EmbeddingHalWrapperAssembler<R, E> + Sync
{
    /// Waits for both producers. No resource gives `None`; no embedded value
    /// gives a wrapper without embedded slot.
    fn wrap_futures_in_resource_wrapper<'a, F, G>(
        &'a self,
        resource: F,
        embedded: G,
        context: &'a RequestContext,
    ) -> BoxFuture<'a, Result<Option<HalResourceWrapper<R, E>>>>
    where
        F: Future<Output = Result<Option<R>>> + Send + 'a,
        G: Future<Output = Result<Option<E>>> + Send + 'a,
    {
        async move {
            match future::try_join(resource, embedded).await? {
                (Some(resource), embedded) => {
                    EmbeddingHalWrapperAssemblerExt::wrap_in_resource_wrapper(self, resource, embedded, context)
                        .map(Some)
                }
                (None, _) => Ok(None),
            }
        }
        .boxed()
    }

    fn wrap_futures_in_resource_wrapper_with_list<'a, F, S>(
        &'a self,
        resource: F,
        embedded: S,
        context: &'a RequestContext,
    ) -> BoxFuture<'a, Result<Option<HalResourceWrapper<R, E>>>>
    where
        F: Future<Output = Result<Option<R>>> + Send + 'a,
        S: Stream<Item = Result<E>> + Send + 'a,
    {
        async move {
            match future::try_join(resource, embedded.try_collect::<Vec<E>>()).await? {
                (Some(resource), embedded) => self
                    .wrap_in_resource_wrapper_with_list(resource, embedded, context)
                    .map(Some),
                (None, _) => Ok(None),
            }
        }
        .boxed()
    }

    /// Pairs the n-th resource with the n-th embedded value; stops at the
    /// shorter stream.
    fn wrap_streams_in_list_wrapper<'a, S, T>(
        &'a self,
        resources: S,
        embedded: T,
        context: &'a RequestContext,
    ) -> BoxFuture<'a, Result<HalListWrapper<R, E>>>
    where
        S: Stream<Item = Result<R>> + Send + 'a,
        T: Stream<Item = Result<E>> + Send + 'a,
    {
        async move {
            let pairs: Vec<(R, E)> = resources
                .zip(embedded)
                .map(|(resource, embedded)| -> Result<(R, E)> { Ok((resource?, embedded?)) })
                .try_collect()
                .await?;

            EmbeddingHalWrapperAssemblerExt::wrap_in_list_wrapper(self, pairs, context)
        }
        .boxed()
    }

    /// Looks up the embedded value of each resource in turn, keeping the
    /// resources in production order.
    fn wrap_stream_with_lookup_in_list_wrapper<'a, S, L, G>(
        &'a self,
        resources: S,
        lookup: L,
        context: &'a RequestContext,
    ) -> BoxFuture<'a, Result<HalListWrapper<R, E>>>
    where
        S: Stream<Item = Result<R>> + Send + 'a,
        L: Fn(&R) -> G + Send + 'a,
        G: Future<Output = Result<E>> + Send + 'a,
    {
        async move {
            let pairs: Vec<(R, E)> = resources
                .and_then(move |resource| {
                    let embedded = lookup(&resource);
                    async move { Ok::<_, Error>((resource, embedded.await?)) }
                })
                .try_collect()
                .await?;

            EmbeddingHalWrapperAssemblerExt::wrap_in_list_wrapper(self, pairs, context)
        }
        .boxed()
    }
}

impl<R, E, A> ReactiveEmbeddingHalWrapperAssembler<R, E> for A
where
    R: Send + 'static,
    E: Send + 'static,
    A: EmbeddingHalWrapperAssembler<R, E> + Sync + ?Sized,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HalError;
    use crate::link::Link;
    use futures::executor::block_on;
    use futures::stream;

    #[derive(Clone, Debug, PartialEq)]
    struct Author {
        id: u64,
    }

    #[derive(Clone, Debug, PartialEq)]
    struct Book {
        title: String,
    }

    struct AuthorAssembler;

    impl FlatHalWrapperAssembler<Author> for AuthorAssembler {
        fn build_self_link_for_resource(&self, author: &Author, _context: &RequestContext) -> Result<Link> {
            Ok(Link::as_self_of(format!("/authors/{}", author.id)))
        }

        fn build_self_link_for_resource_list(&self, _context: &RequestContext) -> Result<Link> {
            Ok(Link::as_self_of("/authors"))
        }
    }

    impl EmbeddingHalWrapperAssembler<Author, Book> for AuthorAssembler {
        fn build_self_link_for_resource(&self, author: &Author, _context: &RequestContext) -> Result<Link> {
            Ok(Link::as_self_of(format!("/authors/{}", author.id)))
        }

        fn build_self_link_for_embedded(&self, book: &Book, _context: &RequestContext) -> Result<Link> {
            Ok(Link::as_self_of("/books").slash(&book.title))
        }

        fn build_self_link_for_resource_list(&self, _context: &RequestContext) -> Result<Link> {
            Ok(Link::as_self_of("/authors"))
        }
    }

    fn authors(ids: &[u64]) -> Vec<Result<Author>> {
        ids.iter().map(|&id| Ok(Author { id })).collect()
    }

    fn book(title: &str) -> Book {
        Book { title: title.into() }
    }

    fn ids<E>(list: &HalListWrapper<Author, E>) -> Vec<u64> {
        list.items().iter().map(|item| item.resource().id).collect()
    }

    #[test]
    fn future_resource() {
        let context = RequestContext::new();
        let resource = future::ready(Ok(Some(Author { id: 5 })));

        let actual = block_on(ReactiveFlatHalWrapperAssembler::wrap_future_in_resource_wrapper(
            &AuthorAssembler,
            resource,
            &context,
        ))
        .expect("valid wrapper")
        .expect("resource present");

        assert_eq!(actual.resource(), &Author { id: 5 });
        assert_eq!(actual.links().get("self").map(Link::href), Some("/authors/5"));
    }

    #[test]
    fn absent_future_resource() {
        let context = RequestContext::new();
        let resource = future::ready(Ok(None::<Author>));

        let actual = block_on(ReactiveFlatHalWrapperAssembler::wrap_future_in_resource_wrapper(
            &AuthorAssembler,
            resource,
            &context,
        ))
        .expect("no failure");

        assert!(actual.is_none());
    }

    #[test]
    fn stream_keeps_order() {
        let context = RequestContext::new();

        let actual = block_on(ReactiveFlatHalWrapperAssembler::wrap_stream_in_list_wrapper(
            &AuthorAssembler,
            stream::iter(authors(&[3, 1, 2])),
            &context,
        ))
        .expect("valid list");

        assert_eq!(ids(&actual), vec![3, 1, 2]);
    }

    #[test]
    fn empty_stream() {
        let context = RequestContext::new();

        let actual = block_on(ReactiveFlatHalWrapperAssembler::wrap_stream_in_list_wrapper(
            &AuthorAssembler,
            stream::iter(authors(&[])),
            &context,
        ))
        .expect("valid list");

        assert!(actual.is_empty());
        assert_eq!(actual.links().rels(), vec!["self"]);
    }

    #[test]
    fn stream_failure_propagates() {
        let context = RequestContext::new();
        let items: Vec<Result<Author>> = vec![
            Ok(Author { id: 1 }),
            Err(HalError::InvalidPageSize.into()),
            Ok(Author { id: 2 }),
        ];

        let err = block_on(ReactiveFlatHalWrapperAssembler::wrap_stream_in_list_wrapper(
            &AuthorAssembler,
            stream::iter(items),
            &context,
        ))
        .unwrap_err();

        assert_eq!(err.downcast_ref::<HalError>(), Some(&HalError::InvalidPageSize));
    }

    #[test]
    fn paged_stream() {
        let context = RequestContext::new();
        let sort = SortCriteria::new();

        let actual = block_on(ReactiveFlatHalWrapperAssembler::wrap_stream_in_paged_list_wrapper(
            &AuthorAssembler,
            stream::iter(authors(&[1, 2])),
            future::ready(Ok(4)),
            2,
            0,
            &sort,
            &context,
        ))
        .expect("valid list");

        assert_eq!(actual.page_info().map(HalPageInfo::total_pages), Some(2));
        assert_eq!(actual.links().rels(), vec!["self", "next", "last"]);
    }

    #[test]
    fn futures_with_embedded() {
        let context = RequestContext::new();

        let actual = block_on(AuthorAssembler.wrap_futures_in_resource_wrapper(
            future::ready(Ok(Some(Author { id: 1 }))),
            future::ready(Ok(Some(book("dune")))),
            &context,
        ))
        .expect("valid wrapper")
        .expect("resource present");

        assert_eq!(actual.embedded_shape(), crate::resource::EmbeddedShape::Single);
    }

    #[test]
    fn futures_without_embedded() {
        let context = RequestContext::new();

        let actual = block_on(AuthorAssembler.wrap_futures_in_resource_wrapper(
            future::ready(Ok(Some(Author { id: 1 }))),
            future::ready(Ok(None)),
            &context,
        ))
        .expect("valid wrapper")
        .expect("resource present");

        assert_eq!(actual.embedded_shape(), crate::resource::EmbeddedShape::Absent);
    }

    #[test]
    fn futures_with_empty_embedded_stream() {
        let context = RequestContext::new();

        let actual = block_on(AuthorAssembler.wrap_futures_in_resource_wrapper_with_list(
            future::ready(Ok(Some(Author { id: 1 }))),
            stream::iter(Vec::<Result<Book>>::new()),
            &context,
        ))
        .expect("valid wrapper")
        .expect("resource present");

        assert_eq!(actual.embedded_shape(), crate::resource::EmbeddedShape::List);
    }

    #[test]
    fn zipped_streams() {
        let context = RequestContext::new();
        let books = vec![Ok(book("a")), Ok(book("b")), Ok(book("c"))];

        let actual = block_on(AuthorAssembler.wrap_streams_in_list_wrapper(
            stream::iter(authors(&[7, 8])),
            stream::iter(books),
            &context,
        ))
        .expect("valid list");

        assert_eq!(ids(&actual), vec![7, 8]);
    }

    #[test]
    fn lookup_keeps_order() {
        let context = RequestContext::new();

        let actual = block_on(AuthorAssembler.wrap_stream_with_lookup_in_list_wrapper(
            stream::iter(authors(&[2, 9, 4])),
            |author: &Author| future::ready(Ok(book(&format!("book-{}", author.id)))),
            &context,
        ))
        .expect("valid list");

        assert_eq!(ids(&actual), vec![2, 9, 4]);
        assert_eq!(
            actual.items()[1].links().get("self").map(Link::href),
            Some("/authors/9")
        );
    }

    #[test]
    fn lookup_failure_propagates() {
        let context = RequestContext::new();

        let err = block_on(AuthorAssembler.wrap_stream_with_lookup_in_list_wrapper(
            stream::iter(authors(&[1])),
            |_: &Author| future::ready(Err::<Book, _>(HalError::MissingRelation("/books".into()).into())),
            &context,
        ))
        .unwrap_err();

        assert_eq!(
            err.downcast_ref::<HalError>(),
            Some(&HalError::MissingRelation("/books".into()))
        );
    }
}
