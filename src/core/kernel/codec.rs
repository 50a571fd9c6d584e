use crate::core::errors::ExchangeError;

/// Exchange-specific view of inbound WebSocket frames
///
/// The connection asks the codec two questions about every frame: does it
/// answer an outstanding command, and if not, what push message does it
/// carry. Each exchange implements this for its own wire format.
pub trait WsCodec: Send + Sync + 'static {
    /// The type representing parsed push messages from this exchange
    type Message: Send + 'static;

    /// Correlation key of a command response, `None` for push frames
    fn correlation_id(&self, frame: &[u8]) -> Option<u64>;

    /// Decode an uncorrelated frame
    ///
    /// # Returns
    /// - `Ok(Some(message))` - Successfully decoded message
    /// - `Ok(None)` - Frame was ignored/filtered by codec
    /// - `Err(error)` - Failed to decode frame
    fn decode_message(&self, frame: &[u8]) -> Result<Option<Self::Message>, ExchangeError>;

    /// Frame to send straight back when `frame` is a server keepalive
    ///
    /// The read loop writes the reply itself, so keepalives are answered
    /// whether or not anyone consumes the data channel.
    fn keepalive_reply(&self, _frame: &[u8]) -> Option<Vec<u8>> {
        None
    }
}
