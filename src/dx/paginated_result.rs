//! # Paginated result module
//!
//! This module contains the [`PaginatedResult`] type which is returned by
//! list endpoints (history and presence) of the [`Ably REST API`].
//!
//! [`Ably REST API`]: https://ably.com/docs/api/rest-api

use std::{collections::HashMap, sync::Arc};

use crate::{
    core::{
        utils::{encoding::url_decode, headers::LINK},
        AblyError, CryptoProvider, Decodable, Deserializer, Transport, TransportRequest,
        TransportResponse,
    },
    dx::ably_client::AblyClientInstance,
};

/// Relation name of the first page link.
const REL_FIRST: &str = "first";

/// Relation name of the next page link.
const REL_NEXT: &str = "next";

/// Single page of the list endpoint response.
///
/// Page holds items decoded with the channel cipher and links to the
/// neighbouring pages which has been provided by the service in `Link`
/// header.
///
/// # Examples
/// ```no_run
/// use ably::AblyClientBuilder;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), ably::core::AblyError> {
/// let client = // AblyClient
/// #     AblyClientBuilder::with_reqwest_transport()
/// #         .with_key("appId.keyId:secret")
/// #         .build()?;
/// let mut page = client.channel("news").history().limit(10).execute().await?;
///
/// loop {
///     for message in page.items() {
///         println!("{:?}: {:?}", message.name, message.data);
///     }
///
///     match page.next().await? {
///         Some(next) => page = next,
///         None => break,
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct PaginatedResult<I, T, D> {
    items: Vec<I>,

    client: AblyClientInstance<T, D>,

    /// Request which has been used to fetch this page.
    request: TransportRequest,

    cipher: Option<Arc<dyn CryptoProvider>>,

    /// Pages requests by relation name.
    links: HashMap<String, TransportRequest>,
}

impl<I, T, D> PaginatedResult<I, T, D> {
    fn new(
        client: &AblyClientInstance<T, D>,
        request: TransportRequest,
        cipher: Option<Arc<dyn CryptoProvider>>,
        items: Vec<I>,
        response: &TransportResponse,
    ) -> Self
    where
        I: Decodable,
    {
        let links = response
            .header(LINK)
            .map(|header| parse_links(header, &request))
            .unwrap_or_default();
        let items = items
            .into_iter()
            .map(|item| item.decode(cipher.as_deref()))
            .collect();

        Self {
            items,
            client: client.clone(),
            request,
            cipher,
            links,
        }
    }

    /// Items of the current page.
    pub fn items(&self) -> &[I] {
        &self.items
    }

    /// Take items of the current page.
    pub fn into_items(self) -> Vec<I> {
        self.items
    }

    /// Whether there is a page after the current one.
    pub fn has_next(&self) -> bool {
        self.links.contains_key(REL_NEXT)
    }

    /// Whether current page is the last one.
    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    fn first_request(&self) -> TransportRequest {
        self.links
            .get(REL_FIRST)
            .cloned()
            .unwrap_or_else(|| self.request.clone())
    }
}

impl<I, T, D> PaginatedResult<I, T, D>
where
    I: Decodable + for<'de> serde::Deserialize<'de>,
    T: Transport,
    D: Deserializer,
{
    /// Fetch page with provided `request`.
    pub(crate) async fn fetch(
        client: &AblyClientInstance<T, D>,
        request: TransportRequest,
        cipher: Option<Arc<dyn CryptoProvider>>,
    ) -> Result<Self, AblyError> {
        let (items, response) = request
            .send::<Vec<I>, _, _>(&client.transport, client.deserializer.as_ref())
            .await?;

        Ok(Self::new(
            client,
            request,
            cipher,
            items.unwrap_or_default(),
            &response,
        ))
    }

    /// Fetch the next page.
    ///
    /// Returns `None` when current page is the last one.
    pub async fn next(&self) -> Result<Option<Self>, AblyError> {
        match self.links.get(REL_NEXT) {
            Some(request) => {
                Self::fetch(&self.client, request.clone(), self.cipher.clone())
                    .await
                    .map(Some)
            }
            None => Ok(None),
        }
    }

    /// Fetch the first page.
    pub async fn first(&self) -> Result<Self, AblyError> {
        Self::fetch(&self.client, self.first_request(), self.cipher.clone()).await
    }
}

#[cfg(feature = "blocking")]
impl<I, T, D> PaginatedResult<I, T, D>
where
    I: Decodable + for<'de> serde::Deserialize<'de>,
    T: crate::core::blocking::Transport,
    D: Deserializer,
{
    /// Fetch page with provided `request`.
    pub(crate) fn fetch_blocking(
        client: &AblyClientInstance<T, D>,
        request: TransportRequest,
        cipher: Option<Arc<dyn CryptoProvider>>,
    ) -> Result<Self, AblyError> {
        let (items, response) =
            request.send_blocking::<Vec<I>, _, _>(&client.transport, client.deserializer.as_ref())?;

        Ok(Self::new(
            client,
            request,
            cipher,
            items.unwrap_or_default(),
            &response,
        ))
    }

    /// Fetch the next page.
    ///
    /// Returns `None` when current page is the last one.
    pub fn next_blocking(&self) -> Result<Option<Self>, AblyError> {
        self.links
            .get(REL_NEXT)
            .map(|request| Self::fetch_blocking(&self.client, request.clone(), self.cipher.clone()))
            .transpose()
    }

    /// Fetch the first page.
    pub fn first_blocking(&self) -> Result<Self, AblyError> {
        Self::fetch_blocking(&self.client, self.first_request(), self.cipher.clone())
    }
}

/// Parse `Link` header into requests by relation name.
///
/// Links are resolved relative to the `base` request path:
/// `<./history?limit=10>; rel="next"`.
fn parse_links(header: &str, base: &TransportRequest) -> HashMap<String, TransportRequest> {
    header
        .split(',')
        .filter_map(|link| {
            let (target, params) = link.trim().split_once(';')?;
            let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;
            let rel = params.split(';').find_map(|param| {
                let (key, value) = param.trim().split_once('=')?;
                (key.trim() == "rel").then(|| value.trim().trim_matches('"').to_string())
            })?;

            Some((rel, link_request(target, base)))
        })
        .collect()
}

fn link_request(target: &str, base: &TransportRequest) -> TransportRequest {
    let (path, query) = target.split_once('?').unwrap_or((target, ""));

    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        let directory = base
            .path
            .rsplit_once('/')
            .map_or("", |(directory, _)| directory);
        format!("{directory}/{}", path.trim_start_matches("./"))
    };

    let query_parameters = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (url_decode(key), url_decode(value))
        })
        .collect();

    TransportRequest {
        path,
        query_parameters,
        timeout: base.timeout,
        ..Default::default()
    }
}

#[cfg(test)]
mod should {
    use super::*;
    use crate::{
        core::{message::should::XorCipher, Message, MessageData},
        dx::ably_client::AblyClientBuilder,
        providers::deserialization_serde::DeserializerSerde,
        transport::middleware::AblyMiddleware,
    };
    use spin::Mutex;
    use std::time::Duration;
    use test_case::test_case;

    fn base() -> TransportRequest {
        TransportRequest {
            path: "/channels/news/history".into(),
            timeout: Some(Duration::from_secs(3)),
            ..Default::default()
        }
    }

    #[test]
    fn parse_relative_links() {
        let links = parse_links(
            r#"<./history?start=0&limit=2&direction=backwards>; rel="first", <./history?start=0&end=1535035746063&limit=2&direction=backwards>; rel="next""#,
            &base(),
        );

        let next = links.get(REL_NEXT).unwrap();
        assert_eq!(next.path, "/channels/news/history");
        assert_eq!(next.query_parameters.get("end"), Some(&"1535035746063".into()));
        assert_eq!(next.timeout, Some(Duration::from_secs(3)));
        assert_eq!(
            links.get(REL_FIRST).unwrap().query_parameters.get("limit"),
            Some(&"2".into())
        );
    }

    #[test_case("</channels/news/presence?limit=1>; rel=\"next\"" => "/channels/news/presence"; "absolute path")]
    #[test_case("<history?limit=1>; rel=\"next\"" => "/channels/news/history"; "bare relative path")]
    #[test_case("<./history?limit=1>;rel=next" => "/channels/news/history"; "unquoted relation")]
    fn resolve_link_path(header: &str) -> String {
        parse_links(header, &base()).remove(REL_NEXT).unwrap().path
    }

    #[test]
    fn decode_encoded_query() {
        let links = parse_links(
            r#"<./history?format=json&clientId=a%20b>; rel="current""#,
            &base(),
        );

        assert_eq!(
            links["current"].query_parameters.get("clientId"),
            Some(&"a b".into())
        );
    }

    #[test]
    fn ignore_malformed_links() {
        assert!(parse_links("garbage, <./history>", &base()).is_empty());
    }

    struct PagesTransport {
        requests: Mutex<Vec<TransportRequest>>,
    }

    #[async_trait::async_trait]
    impl Transport for PagesTransport {
        async fn send(&self, request: TransportRequest) -> Result<TransportResponse, AblyError> {
            let page = request.query_parameters.get("page").cloned();
            self.requests.lock().push(request);

            Ok(match page.as_deref() {
                Some("2") => TransportResponse {
                    status: 200,
                    body: Some(br#"[{"name":"second","data":"2"}]"#.to_vec()),
                    ..Default::default()
                },
                _ => TransportResponse {
                    status: 200,
                    headers: [(
                        "link".into(),
                        r#"<./history?page=2>; rel="next""#.into(),
                    )]
                    .into(),
                    body: Some(br#"[{"name":"first","data":"1"}]"#.to_vec()),
                },
            })
        }
    }

    type TestClient = AblyClientInstance<AblyMiddleware<PagesTransport>, DeserializerSerde>;

    fn client() -> TestClient {
        AblyClientBuilder::with_transport(PagesTransport {
            requests: Mutex::new(vec![]),
        })
        .with_key("app.key:secret")
        .build()
        .unwrap()
    }

    #[tokio::test]
    async fn walk_pages() {
        let client = client();

        let page: PaginatedResult<Message, _, _> =
            PaginatedResult::fetch(&client, base(), None).await.unwrap();
        assert!(page.has_next());
        assert_eq!(page.items()[0].name, Some("first".into()));

        let next = page.next().await.unwrap().unwrap();
        assert!(next.is_last());
        assert_eq!(next.items()[0].name, Some("second".into()));
        assert!(next.next().await.unwrap().is_none());

        let first = next.first().await.unwrap();
        assert_eq!(first.into_items()[0].name, Some("first".into()));
        assert_eq!(client.transport.transport.requests.lock().len(), 3);
    }

    struct EncryptedPageTransport;

    #[async_trait::async_trait]
    impl Transport for EncryptedPageTransport {
        async fn send(&self, _request: TransportRequest) -> Result<TransportResponse, AblyError> {
            // "1" xor 0x5a is 0x6b.
            Ok(TransportResponse {
                status: 200,
                body: Some(
                    br#"[{"name":"secret","data":"aw==","encoding":"utf-8/cipher+xor-8/base64"}]"#
                        .to_vec(),
                ),
                ..Default::default()
            })
        }
    }

    #[tokio::test]
    async fn decode_items_with_cipher() {
        let client = AblyClientBuilder::with_transport(EncryptedPageTransport)
            .with_key("app.key:secret")
            .build()
            .unwrap();

        let page: PaginatedResult<Message, _, _> =
            PaginatedResult::fetch(&client, base(), Some(Arc::new(XorCipher)))
                .await
                .unwrap();

        assert_eq!(page.items()[0].data, Some(MessageData::Text("1".into())));
        assert_eq!(page.items()[0].encoding, None);
        assert!(page.is_last());
    }
}
