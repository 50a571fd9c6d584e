use crate::core::errors::ExchangeError;
use crate::core::types::{
    AssetClass, CancelAllResponse, CurrencyPair, OrderCancel, OrderDetail, OrderModify,
    OrderRequest, OrderResponse, OrdersQuery,
};

/// Order management for Crypto.com
///
/// No order endpoint is wired up yet. Every operation reports
/// `NotImplemented`, after input validation where the input can be checked.
#[derive(Debug, Default)]
pub struct Trading;

impl Trading {
    pub fn new() -> Self {
        Self
    }

    pub async fn submit_order(&self, order: OrderRequest) -> Result<OrderResponse, ExchangeError> {
        order
            .validate()
            .map_err(|e| ExchangeError::InvalidParameters(e.to_string()))?;
        Err(ExchangeError::NotImplemented("submit_order".to_string()))
    }

    pub async fn modify_order(&self, _modify: OrderModify) -> Result<String, ExchangeError> {
        Err(ExchangeError::NotImplemented("modify_order".to_string()))
    }

    pub async fn cancel_order(&self, _cancel: OrderCancel) -> Result<(), ExchangeError> {
        Err(ExchangeError::NotImplemented("cancel_order".to_string()))
    }

    pub async fn cancel_batch_orders(
        &self,
        _cancels: Vec<OrderCancel>,
    ) -> Result<CancelAllResponse, ExchangeError> {
        Err(ExchangeError::NotImplemented(
            "cancel_batch_orders".to_string(),
        ))
    }

    pub async fn cancel_all_orders(
        &self,
        _cancel: OrderCancel,
    ) -> Result<CancelAllResponse, ExchangeError> {
        Err(ExchangeError::NotImplemented("cancel_all_orders".to_string()))
    }

    pub async fn get_order_info(
        &self,
        _order_id: &str,
        _pair: &CurrencyPair,
        _asset: AssetClass,
    ) -> Result<OrderDetail, ExchangeError> {
        Err(ExchangeError::NotImplemented("get_order_info".to_string()))
    }

    pub async fn get_active_orders(
        &self,
        _query: OrdersQuery,
    ) -> Result<Vec<OrderDetail>, ExchangeError> {
        Err(ExchangeError::NotImplemented("get_active_orders".to_string()))
    }

    pub async fn get_order_history(
        &self,
        _query: OrdersQuery,
    ) -> Result<Vec<OrderDetail>, ExchangeError> {
        Err(ExchangeError::NotImplemented("get_order_history".to_string()))
    }
}
