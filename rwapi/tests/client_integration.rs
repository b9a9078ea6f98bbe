use mockito::{Matcher, Server};
use rwapi::{
    Client, ClientConfig, DateInterval, Facet, FacetKind, FacetScope, Filter, Operator, Query,
    RangeValue, RwApiError, SortDirection,
};
use serde::Deserialize;
use std::io::Write;
use std::time::Duration;

#[derive(Debug, Deserialize, PartialEq)]
struct Report {
    title: String,
    #[serde(default)]
    source: Vec<Source>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Source {
    shortname: String,
}

fn test_client(server_url: &str, appname: Option<&str>) -> Client {
    let config = ClientConfig {
        base_url: format!("{}/v1/", server_url),
        appname: appname.map(str::to_string),
        timeout_seconds: 5,
    };
    Client::from_config(&config).unwrap()
}

const REPORTS_BODY: &str = r#"{
    "totalCount": 2451,
    "count": 2,
    "data": [
        {
            "id": "4012345",
            "score": 12.5,
            "href": "https://api.example.org/v1/reports/4012345",
            "fields": {"title": "Flash Update No. 3", "source": [{"shortname": "OCHA"}]}
        },
        {
            "id": "4012301",
            "score": 11.0,
            "href": "https://api.example.org/v1/reports/4012301",
            "fields": {"title": "Situation Report"}
        }
    ],
    "embedded": {
        "facets": {
            "sources": {
                "type": "term",
                "data": [{"value": "OCHA", "count": 812}, {"value": "UNICEF", "count": 402}],
                "missing": 0,
                "more": true
            },
            "date.created": {
                "type": "date",
                "data": [{"value": "2024-01-01T00:00:00+00:00", "count": 2451}],
                "missing": 3,
                "more": false
            }
        }
    }
}"#;

#[tokio::test]
async fn test_search_reports_end_to_end() {
    let mut server = Server::new_async().await;

    let mut filter = Filter::all();
    filter
        .add_condition("country.iso3", vec!["sdn", "ssd"], Some(Operator::Or), false)
        .unwrap();
    filter
        .add_condition(
            "date.created",
            RangeValue::starting_at("2024-01-01T00:00:00+00:00"),
            None,
            false,
        )
        .unwrap();

    let mut sources = Facet::new("source.shortname");
    sources
        .set_name("sources")
        .set_limit(2)
        .set_sort("count", SortDirection::Desc);
    let mut dates = Facet::new("date.created");
    dates
        .set_interval(DateInterval::Year)
        .set_scope(FacetScope::Query);

    let mut query = Query::new();
    query
        .set_fields(
            vec!["title".to_string(), "source.shortname".to_string()],
            Vec::new(),
        )
        .set_range(2, 0)
        .add_sort("date.created", SortDirection::Desc)
        .set_query("cholera", vec!["title".to_string()], Some(Operator::And))
        .set_filter(filter)
        .add_facet(sources)
        .add_facet(dates);

    let mock = server
        .mock("POST", "/v1/reports")
        .match_query(Matcher::UrlEncoded(
            "appname".to_string(),
            "crisis monitor".to_string(),
        ))
        .match_header("content-type", "application/json")
        .match_body(Matcher::JsonString(
            r#"{
                "fields": {"include": ["title", "source.shortname"]},
                "limit": 2,
                "offset": 0,
                "sort": ["date.created:desc"],
                "query": {"value": "cholera", "fields": ["title"], "operator": "AND"},
                "filter": {
                    "operator": "AND",
                    "conditions": [
                        {"operator": "OR", "field": "country.iso3", "value": ["sdn", "ssd"]},
                        {"field": "date.created", "value": {"from": "2024-01-01T00:00:00+00:00"}}
                    ]
                },
                "facets": [
                    {"name": "sources", "field": "source.shortname", "limit": 2, "sort": "count:desc"},
                    {"field": "date.created", "interval": "year", "scope": "query"}
                ]
            }"#
            .to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(REPORTS_BODY)
        .create_async()
        .await;

    let client = test_client(&server.url(), Some("crisis monitor"));
    let (envelope, reports) = client.query_as::<Report>("reports", &query).await.unwrap();

    mock.assert_async().await;
    assert_eq!(envelope.total_count, 2451);
    assert_eq!(envelope.count, 2);
    assert_eq!(envelope.items[0].id, "4012345");
    assert_eq!(
        reports,
        vec![
            Report {
                title: "Flash Update No. 3".to_string(),
                source: vec![Source {
                    shortname: "OCHA".to_string()
                }],
            },
            Report {
                title: "Situation Report".to_string(),
                source: Vec::new(),
            },
        ]
    );

    let sources = envelope.facet("sources").unwrap();
    assert_eq!(sources.kind, FacetKind::Term);
    assert_eq!(sources.data.len(), 2);
    assert!(sources.more);
    assert_eq!(envelope.facet("date.created").unwrap().missing, 3);
}

#[tokio::test]
async fn test_query_item_by_id() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/v1/countries/13")
        .match_body(Matcher::JsonString(
            r#"{"fields": {"include": ["name"]}}"#.to_string(),
        ))
        .with_status(200)
        .with_body(
            r#"{"totalCount":1,"count":1,"data":[{"id":"13","score":1,"href":"h","fields":{"name":"Afghanistan"}}]}"#,
        )
        .create_async()
        .await;

    let mut query = Query::new();
    query.set_fields(vec!["name".to_string()], Vec::new());

    let client = test_client(&server.url(), None);
    let envelope = client.query_item("countries", "13", &query).await.unwrap();

    mock.assert_async().await;
    let value: serde_json::Value = envelope.items[0].decode_fields().unwrap();
    assert_eq!(value["name"], "Afghanistan");
}

#[tokio::test]
async fn test_query_raw_returns_body_verbatim() {
    let mut server = Server::new_async().await;
    let body = r#"{"totalCount":0,"count":0,"data":[]}"#;

    let _mock = server
        .mock("POST", "/v1/disasters")
        .with_status(200)
        .with_body(body)
        .create_async()
        .await;

    let client = test_client(&server.url(), None);
    let raw = client.query_raw("disasters", &Query::new()).await.unwrap();
    assert_eq!(raw, body.as_bytes());
}

#[tokio::test]
async fn test_non_success_status_is_reported_with_body() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/v1/reports")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"error":{"type":"InvalidFieldException"}}"#)
        .create_async()
        .await;

    let mut query = Query::new();
    query.add_sort("nonexistent", SortDirection::Asc);

    let client = test_client(&server.url(), Some("tests"));
    let err = client.query("reports", &query).await.unwrap_err();

    match err {
        RwApiError::UnexpectedStatus {
            url,
            payload,
            status,
            body,
        } => {
            assert!(url.ends_with("/v1/reports?appname=tests"));
            assert_eq!(payload, r#"{"sort":["nonexistent:asc"]}"#);
            assert_eq!(status, 400);
            assert!(body.contains("InvalidFieldException"));
        }
        other => panic!("expected unexpected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_bad_item_fails_whole_materialization() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/v1/reports")
        .with_status(200)
        .with_body(
            r#"{"totalCount":2,"count":2,"data":[
                {"id":"1","score":1,"href":"h1","fields":{"title":"A"}},
                {"id":"2","score":1,"href":"h2","fields":{"title":["not","a","string"]}}
            ]}"#,
        )
        .create_async()
        .await;

    let client = test_client(&server.url(), None);
    let err = client
        .query_as::<Report>("reports", &Query::new())
        .await
        .unwrap_err();

    assert!(matches!(err, RwApiError::ItemDecode { index: 1, .. }));
}

#[tokio::test]
async fn test_invalid_facet_is_rejected_before_sending() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/v1/reports")
        .expect(0)
        .create_async()
        .await;

    let mut facet = Facet::new("date.created");
    facet.set_limit(5).set_interval(DateInterval::Month);
    let mut query = Query::new();
    query.add_facet(facet);

    let client = test_client(&server.url(), None);
    let err = client.query("reports", &query).await.unwrap_err();

    assert!(matches!(err, RwApiError::InvalidFacet { .. }));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_sub_second_timeout_keeps_precision() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/v1/reports")
        .match_query(Matcher::UrlEncoded(
            "appname".to_string(),
            "tests".to_string(),
        ))
        .with_status(200)
        .with_body(r#"{"totalCount":0,"count":0,"data":[]}"#)
        .create_async()
        .await;

    let client = Client::new("tests", Duration::from_millis(500))
        .unwrap()
        .with_base_url(&format!("{}/v1/", server.url()));
    let envelope = client.query("reports", &Query::new()).await.unwrap();

    mock.assert_async().await;
    assert!(envelope.is_empty());
}

#[tokio::test]
async fn test_item_id_is_encoded_in_path() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/v1/reports/a%2Fb")
        .with_status(200)
        .with_body(r#"{"totalCount":0,"count":0,"data":null}"#)
        .create_async()
        .await;

    let client = test_client(&server.url(), None);
    let envelope = client
        .query_item("reports", "a/b", &Query::new())
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(envelope.is_empty());
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("POST", "/v1/reports")
        .with_status(200)
        .with_chunked_body(|w| {
            std::thread::sleep(Duration::from_secs(3));
            w.write_all(b"{}")
        })
        .create_async()
        .await;

    let config = ClientConfig {
        base_url: format!("{}/v1/", server.url()),
        appname: None,
        timeout_seconds: 1,
    };
    let client = Client::from_config(&config).unwrap();
    let err = client.query("reports", &Query::new()).await.unwrap_err();

    assert!(matches!(err, RwApiError::Transport { .. }));
}
