//! Demo stock broker. Prices drift down as the conversation grows.

use handoff_core::{ConversationContext, Param};
use handoff_tools::{AgentDeclaration, CapabilityOutput, Member};
use std::collections::BTreeMap;

pub struct StockBroker;

fn price(context: &ConversationContext<'_>) -> i64 {
    100 - context.history().len() as i64
}

pub fn declaration() -> AgentDeclaration {
    AgentDeclaration::agent::<StockBroker>("StockBroker", module_path!())
        .instructions("You are a stock broker agent. You provide stock prices and investment advice.")
        .description("If you need any help with stock market related tasks use me.")
        .construct_with(|| Ok(StockBroker))
        .capability(
            Member::new("get_stock_price", "Get the stock price for a given stock symbol")
                .param(Param::context())
                .param(Param::of::<String>().describe("The stock symbol")),
            |_, mut frame| {
                let symbol: String = frame.arg(0)?;
                let price = price(frame.context()?);
                Ok(format!("The current price of {symbol} is ${price}").into())
            },
        )
        .capability(
            Member::new(
                "get_stock_price_at_temperature",
                "Get the stock price for a given stock symbol at a given temperature",
            )
            .param(Param::context())
            .param(Param::of::<String>().describe("The stock symbol"))
            .param(Param::of::<String>().describe("The temperature in Celsius")),
            |_, mut frame| {
                let symbol: String = frame.arg(0)?;
                let temperature: String = frame.arg(1)?;
                let price = price(frame.context()?);
                Ok(format!("The price of {symbol} at {temperature}°C is ${price}").into())
            },
        )
        .capability(
            Member::new(
                "get_best_stocks",
                "Get the best stocks to invest in and their current price",
            )
            .param(Param::context()),
            |_, _frame| {
                let best = BTreeMap::from([("AAPL", "$100"), ("AMZN", "$300"), ("GOOGL", "$200")]);
                CapabilityOutput::json(&best)
            },
        )
        .build()
}
