//! Renders a currency's chart as an ECharts line chart with zoom controls.
//!
//! Zoom gestures are reported back to the server as the leftmost and rightmost
//! visible axis labels, which the server turns into a narrower fetch.

use charming::{
    Chart,
    component::{Axis, DataZoom, DataZoomType, Grid, Title},
    element::{AxisType, Tooltip, Trigger},
    series::Line,
};
use maud::{Markup, PreEscaped, html};

use crate::{
    chart::{BalanceSeries, ChartState, ChartView, series::flat_zero},
    currency::CurrencyCode,
    display_mode::DisplayMode,
    endpoints::{self, format_endpoint},
    html::{BUTTON_SECONDARY_STYLE, loading_spinner},
    query::RangeSelection,
};

/// How long to wait for a zoom gesture to settle before reporting it.
const ZOOM_DEBOUNCE_MS: u64 = 500;

/// The fraction of the visible window that the "Zoom in" button removes.
const ZOOM_IN_STEP: f64 = 0.05;

pub fn chart_card_id(currency: CurrencyCode) -> String {
    format!("chart-card-{}", currency.code())
}

fn chart_element_id(currency: CurrencyCode) -> String {
    format!("balance-chart-{}", currency.code())
}

fn zoom_button_id(currency: CurrencyCode) -> String {
    format!("zoom-in-{}", currency.code())
}

/// The ECharts options for plotting `series` in `mode`.
pub fn balance_chart(currency: CurrencyCode, mode: DisplayMode, series: &BalanceSeries) -> Chart {
    let (labels, values) = series.labels_and_values();

    Chart::new()
        .title(
            Title::new()
                .text(format!("Selected currency is: {}", currency.code()))
                .subtext(currency.symbol()),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Axis))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom(60)
                .contain_label(true),
        )
        .data_zoom(DataZoom::new().type_(DataZoomType::Inside))
        .data_zoom(DataZoom::new().type_(DataZoomType::Slider))
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .name(mode.axis_name())
                .data(labels),
        )
        .y_axis(Axis::new().type_(AxisType::Value).name("Balance"))
        .series(Line::new().name("Balance").data(values))
}

/// The series to plot for `mode`, if there is one to plot yet.
///
/// A chart with no accepted series plots a flat zero line across the range it
/// would have been fetched for, unless a fetch is still running.
fn plotted_series(
    chart: &ChartView,
    mode: DisplayMode,
    committed: RangeSelection,
) -> Option<BalanceSeries> {
    match chart.series(mode) {
        Some(loaded) => Some(loaded.series.or_flat_zero(&loaded.range)),
        None if chart.is_fetching(mode) => None,
        None => Some(flat_zero(&chart.effective_range(committed))),
    }
}

/// The card holding `chart` as it should be shown in `mode`.
///
/// `committed` is the submitted range for `mode`, if one was given.
pub fn chart_card(
    chart: &ChartView,
    mode: DisplayMode,
    committed: Option<RangeSelection>,
) -> Markup {
    let currency = chart.currency();
    let card_id = chart_card_id(currency);

    html! {
        div
            id=(card_id)
            class="w-full p-4 rounded bg-white dark:bg-gray-100 shadow"
            hx-target-error="#alert-container"
        {
            @match committed {
                None => {
                    p class="text-gray-900"
                    {
                        "No " (mode.axis_name().to_lowercase()) " range was given for "
                        (currency.symbol()) ". Enter one and submit the form to chart it."
                    }
                }
                Some(committed) => {
                    div class="flex gap-2 justify-end items-center mb-2"
                    {
                        @if chart.state() == ChartState::Zoomed {
                            span class="text-sm text-gray-500" { "Zoomed" }
                        }

                        button
                            id=(zoom_button_id(currency))
                            type="button"
                            class=(BUTTON_SECONDARY_STYLE)
                        {
                            "Zoom in"
                        }

                        button
                            type="button"
                            class=(BUTTON_SECONDARY_STYLE)
                            hx-post=(format_endpoint(endpoints::CHART_RESET, currency.code()))
                            hx-target={ "#" (card_id) }
                            hx-swap="outerHTML"
                        {
                            "Reset chart"
                        }
                    }

                    @match plotted_series(chart, mode, committed) {
                        Some(series) => {
                            div
                                id=(chart_element_id(currency))
                                class="min-h-[380px]"
                            {}

                            script
                            {
                                (chart_script(chart, &balance_chart(currency, mode, &series)))
                            }
                        }
                        None => {
                            div class="min-h-[380px] flex items-center justify-center text-gray-900"
                            {
                                (loading_spinner())
                                "Loading..."
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Initializes the chart and reports zoom gestures back to the server.
fn chart_script(view: &ChartView, chart: &Chart) -> PreEscaped<String> {
    let currency = view.currency();

    PreEscaped(format!(
        r#"(function() {{
            const chartDom = document.getElementById("{chart_id}");
            const chart = echarts.init(chartDom);
            chart.setOption({options});

            window.addEventListener('resize', () => chart.resize());

            const visibleWindow = () => {{
                const zoom = chart.getOption().dataZoom[0];
                const labels = chart.getOption().xAxis[0].data;
                return {{ zoom, start: labels[zoom.startValue], end: labels[zoom.endValue] }};
            }};

            let pendingZoom;
            chart.on('datazoom', () => {{
                clearTimeout(pendingZoom);
                pendingZoom = setTimeout(() => {{
                    const {{ start, end }} = visibleWindow();
                    if (start === undefined || end === undefined) {{
                        return;
                    }}
                    htmx.ajax('POST', '{zoom_url}', {{
                        target: '#{card_id}',
                        swap: 'outerHTML',
                        values: {{ start: String(start), end: String(end) }},
                    }});
                }}, {debounce});
            }});

            const zoomButton = document.getElementById("{button_id}");
            zoomButton.addEventListener('click', () => {{
                const {{ zoom }} = visibleWindow();
                const step = (zoom.end - zoom.start) * {step} / 2;
                chart.dispatchAction({{ type: 'dataZoom', start: zoom.start + step, end: zoom.end - step }});
                zoomButton.disabled = true;
                setTimeout(() => {{ zoomButton.disabled = false; }}, {cooldown});
            }});
        }})();"#,
        chart_id = chart_element_id(currency),
        options = chart,
        zoom_url = format_endpoint(endpoints::CHART_ZOOM, currency.code()),
        card_id = chart_card_id(currency),
        debounce = ZOOM_DEBOUNCE_MS,
        button_id = zoom_button_id(currency),
        step = ZOOM_IN_STEP,
        cooldown = view.cooldown().as_millis(),
    ))
}
