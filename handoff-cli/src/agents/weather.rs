use handoff_core::Param;
use handoff_core::error::BoxError;
use handoff_tools::{AgentDeclaration, Member};

pub struct WeatherMan;

pub fn declaration() -> AgentDeclaration {
    AgentDeclaration::agent::<WeatherMan>("WeatherMan", module_path!())
        .instructions("You are a weather assistant. You provide weather information for any city.")
        .description("If you need help with the weather use me.")
        .construct_with(|| Ok(WeatherMan))
        .capability(
            Member::new("get_weather", "Get the weather for a given city")
                .param(Param::of::<String>().describe("The city to get the weather for"))
                .param(Param::of::<i64>().describe("The id of the city"))
                .param(Param::of::<Vec<String>>().describe("The nearby cities")),
            |_, frame| {
                let city: String = frame.arg(0)?;
                let id: i64 = frame.arg(1)?;
                let nearby: Vec<String> = frame.arg(2)?;
                Ok(format!(
                    "The weather in {city} is sunny with a high of 25°C. \
                     The id is {id}. The nearby cities are {}",
                    nearby.join(", ")
                )
                .into())
            },
        )
        .capability(
            Member::new("convert_to_fahrenheit", "Convert Celsius to Fahrenheit")
                .param(Param::of::<String>().describe("The input temp in Celsius")),
            |_, frame| {
                let celsius = parse_temperature(&frame.arg::<String>(0)?)?;
                Ok(format!("{:.2}", celsius * 9.0 / 5.0 + 32.0).into())
            },
        )
        .capability(
            Member::new("convert_to_celsius", "Convert Fahrenheit to Celsius")
                .param(Param::of::<String>().describe("The input temp in Fahrenheit")),
            |_, frame| {
                let fahrenheit = parse_temperature(&frame.arg::<String>(0)?)?;
                Ok(format!("{:.2}", (fahrenheit - 32.0) * 5.0 / 9.0).into())
            },
        )
        .build()
}

fn parse_temperature(raw: &str) -> Result<f64, BoxError> {
    raw.trim()
        .parse()
        .map_err(|e| format!("invalid temperature '{raw}': {e}").into())
}
