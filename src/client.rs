//! # Key-Value Client
//!
//! Blocking facade over the request dispatcher. Each method maps to one
//! fixed RPC path, shapes its parameters, and interprets the decoded
//! response. Values go through the client's [`ValueCodec`].

use std::collections::HashMap;
use std::time::Duration;

use crate::config::ClientConfig;
use crate::dispatcher::RequestDispatcher;
use crate::endpoint::Endpoint;
use crate::error::{Result, TycoonError};
use crate::protocol::{bulk_field, split_bulk_field, ColumnEncoding, ParameterMap, Record, NUM_FIELD};
use crate::serializer::{RawCodec, ValueCodec};
use crate::transport::{Connector, RpcResponse};

/// Records and metadata returned by a bulk read
#[derive(Debug, Clone, PartialEq)]
pub struct BulkRecords<V> {
    /// Data records keyed by application key
    pub records: HashMap<String, V>,

    /// Protocol metadata such as `num`
    pub metadata: HashMap<String, Vec<u8>>,
}

/// Key-value store client
pub struct KeyValueClient<C: Connector, S: ValueCodec = RawCodec> {
    dispatcher: RequestDispatcher<C>,
    codec: S,
}

impl<C: Connector> KeyValueClient<C, RawCodec> {
    /// Create a client storing raw bytes
    pub fn new(config: ClientConfig, connector: C) -> Result<Self> {
        Self::with_codec(config, connector, RawCodec)
    }
}

impl<C: Connector, S: ValueCodec> KeyValueClient<C, S> {
    /// Create a client with a custom value codec
    pub fn with_codec(config: ClientConfig, connector: C, codec: S) -> Result<Self> {
        Ok(Self {
            dispatcher: RequestDispatcher::new(config, connector)?,
            codec,
        })
    }

    // =========================================================================
    // Single Records
    // =========================================================================

    /// Fetch a value; `None` when the key is missing
    pub fn get(&mut self, key: &str) -> Result<Option<S::Value>> {
        let params = ParameterMap::new().with("key", key);
        let response = self.request("/rpc/get", Some(params))?;
        if response.is_logical_miss() {
            return Ok(None);
        }
        match response.record().get("value") {
            Some(bytes) => Ok(Some(self.codec.decode(bytes)?)),
            None => Ok(None),
        }
    }

    /// Store a value
    pub fn set(&mut self, key: &str, value: &S::Value, xt: Option<i64>) -> Result<()> {
        let params = self.store_params(key, value, xt)?;
        self.request("/rpc/set", Some(params))?;
        Ok(())
    }

    /// Store a value only if the key is missing
    pub fn add(&mut self, key: &str, value: &S::Value, xt: Option<i64>) -> Result<bool> {
        let params = self.store_params(key, value, xt)?;
        Ok(self.request("/rpc/add", Some(params))?.is_success())
    }

    /// Store a value only if the key exists
    pub fn replace(&mut self, key: &str, value: &S::Value, xt: Option<i64>) -> Result<bool> {
        let params = self.store_params(key, value, xt)?;
        Ok(self.request("/rpc/replace", Some(params))?.is_success())
    }

    /// Append to the stored value
    pub fn append(&mut self, key: &str, value: &S::Value, xt: Option<i64>) -> Result<()> {
        let params = self.store_params(key, value, xt)?;
        self.request("/rpc/append", Some(params))?;
        Ok(())
    }

    /// Compare-and-swap
    ///
    /// `old: None` expects the key to be missing; `new: None` removes it.
    /// Returns false on a mismatch.
    pub fn cas(
        &mut self,
        key: &str,
        old: Option<&S::Value>,
        new: Option<&S::Value>,
        xt: Option<i64>,
    ) -> Result<bool> {
        let oval = old.map(|v| self.codec.encode(v)).transpose()?;
        let nval = new.map(|v| self.codec.encode(v)).transpose()?;
        let params = ParameterMap::new()
            .with("key", key)
            .with_opt("oval", oval)
            .with_opt("nval", nval)
            .with_opt("xt", xt.map(|x| x.to_string()));
        Ok(self.request("/rpc/cas", Some(params))?.is_success())
    }

    /// Remove one key; returns the number of removed records
    pub fn remove(&mut self, key: &str) -> Result<u64> {
        self.remove_bulk([key])
    }

    // =========================================================================
    // Counters
    // =========================================================================

    /// Add `num` to an integer record and return the new value
    pub fn increment(&mut self, key: &str, num: i64, xt: Option<i64>) -> Result<i64> {
        let params = ParameterMap::new()
            .with("key", key)
            .with("num", num.to_string())
            .with_opt("xt", xt.map(|x| x.to_string()));
        let record = self.request("/rpc/increment", Some(params))?.record();
        parse_num(&record)
    }

    /// Subtract `num` from an integer record and return the new value
    pub fn decrement(&mut self, key: &str, num: i64, xt: Option<i64>) -> Result<i64> {
        self.increment(key, -num, xt)
    }

    /// Add `num` to a floating-point record and return the new value
    pub fn increment_double(&mut self, key: &str, num: f64, xt: Option<i64>) -> Result<f64> {
        let params = ParameterMap::new()
            .with("key", key)
            .with("num", num.to_string())
            .with_opt("xt", xt.map(|x| x.to_string()));
        let record = self.request("/rpc/increment_double", Some(params))?.record();
        parse_num(&record)
    }

    // =========================================================================
    // Bulk Operations
    // =========================================================================

    /// Store several records; returns the number stored
    pub fn set_bulk<'a, I>(&mut self, records: I) -> Result<u64>
    where
        I: IntoIterator<Item = (&'a str, &'a S::Value)>,
        S::Value: 'a,
    {
        let mut params = ParameterMap::new();
        for (key, value) in records {
            params.insert(bulk_field(key), self.codec.encode(value)?);
        }
        let record = self.request("/rpc/set_bulk", Some(params))?.record();
        parse_num(&record)
    }

    /// Fetch several records
    pub fn get_bulk<'a, I>(&mut self, keys: I) -> Result<BulkRecords<S::Value>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let response = self.request("/rpc/get_bulk", Some(bulk_key_params(keys)))?;

        let mut bulk = BulkRecords {
            records: HashMap::new(),
            metadata: HashMap::new(),
        };
        for (field, value) in response.record() {
            let value = value.unwrap_or_default();
            match split_bulk_field(&field) {
                Some(key) => {
                    let decoded = self.codec.decode(&value)?;
                    bulk.records.insert(key.to_string(), decoded);
                }
                None => {
                    bulk.metadata.insert(field, value);
                }
            }
        }
        Ok(bulk)
    }

    /// Remove several records; returns the number removed
    pub fn remove_bulk<'a, I>(&mut self, keys: I) -> Result<u64>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let record = self
            .request("/rpc/remove_bulk", Some(bulk_key_params(keys)))?
            .record();
        parse_num(&record)
    }

    // =========================================================================
    // Key Listing
    // =========================================================================

    /// Keys starting with `prefix`
    pub fn match_prefix(&mut self, prefix: &str) -> Result<Vec<String>> {
        let params = ParameterMap::new().with("prefix", prefix);
        let record = self.request("/rpc/match_prefix", Some(params))?.record();
        Ok(data_keys(&record))
    }

    /// Keys matching a regular expression
    pub fn match_regex(&mut self, regex: &str) -> Result<Vec<String>> {
        let params = ParameterMap::new().with("regex", regex);
        let record = self.request("/rpc/match_regex", Some(params))?.record();
        Ok(data_keys(&record))
    }

    /// Every key in the database
    pub fn keys(&mut self) -> Result<Vec<String>> {
        self.match_prefix("")
    }

    // =========================================================================
    // Database Maintenance
    // =========================================================================

    pub fn clear(&mut self) -> Result<()> {
        self.request("/rpc/clear", None)?;
        Ok(())
    }

    pub fn vacuum(&mut self) -> Result<()> {
        self.request("/rpc/vacuum", None)?;
        Ok(())
    }

    /// Flush the database to storage
    pub fn synchronize(&mut self, params: ParameterMap) -> Result<Record> {
        Ok(self.request("/rpc/synchronize", Some(params))?.record())
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Echo the parameters back
    pub fn echo(&mut self, params: ParameterMap) -> Result<Record> {
        Ok(self.request("/rpc/echo", Some(params))?.record())
    }

    /// Server report
    pub fn report(&mut self) -> Result<Record> {
        Ok(self.request("/rpc/report", None)?.record())
    }

    /// Database status
    pub fn status(&mut self) -> Result<Record> {
        Ok(self.request("/rpc/status", None)?.record())
    }

    // =========================================================================
    // Lifecycle and Settings
    // =========================================================================

    /// Open the connection eagerly
    pub fn start(&mut self) -> Result<()> {
        self.dispatcher.start()
    }

    /// Close the connection
    pub fn finish(&mut self) -> Result<()> {
        self.dispatcher.finish()
    }

    /// Send a raw request through the dispatcher
    pub fn request(&mut self, path: &str, params: Option<ParameterMap>) -> Result<RpcResponse> {
        self.dispatcher.invoke(path, params)
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        self.dispatcher.endpoints()
    }

    pub fn set_endpoints(&mut self, endpoints: Vec<Endpoint>) {
        self.dispatcher.set_endpoints(endpoints);
    }

    pub fn set_db(&mut self, db: Option<String>) {
        self.dispatcher.set_db(db);
    }

    pub fn set_column_encoding(&mut self, encoding: ColumnEncoding) {
        self.dispatcher.set_column_encoding(encoding);
    }

    pub fn set_connect_timeout(&mut self, timeout: Duration) {
        self.dispatcher.set_connect_timeout(timeout);
    }

    pub fn dispatcher(&self) -> &RequestDispatcher<C> {
        &self.dispatcher
    }

    pub fn codec(&self) -> &S {
        &self.codec
    }

    fn store_params(&self, key: &str, value: &S::Value, xt: Option<i64>) -> Result<ParameterMap> {
        Ok(ParameterMap::new()
            .with("key", key)
            .with("value", self.codec.encode(value)?)
            .with_opt("xt", xt.map(|x| x.to_string())))
    }
}

fn bulk_key_params<'a, I>(keys: I) -> ParameterMap
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .map(|key| (bulk_field(key), Vec::new()))
        .collect()
}

fn data_keys(record: &Record) -> Vec<String> {
    record
        .keys()
        .filter(|&field| field != NUM_FIELD)
        .filter_map(split_bulk_field)
        .map(str::to_string)
        .collect()
}

fn parse_num<T: std::str::FromStr>(record: &Record) -> Result<T> {
    let raw = record.get_str(NUM_FIELD).ok_or_else(|| {
        TycoonError::UnexpectedResponse(format!("missing '{}' field", NUM_FIELD))
    })?;
    raw.trim().parse().map_err(|_| {
        TycoonError::UnexpectedResponse(format!("invalid '{}' value: {}", NUM_FIELD, raw))
    })
}
