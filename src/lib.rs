pub mod shared {
    pub mod core {
        pub mod clock;
    }
    pub mod infrastructure {
        pub mod record_store;
    }
}

pub mod modules {
    pub mod repository_charts {
        pub mod core {
            pub mod aggregate;
            pub mod bubble_layout;
            pub mod colormap;
            pub mod hour_bucket;
            pub mod record;
            pub mod username;
        }
        pub mod use_cases {
            pub mod fetch_repositories {
                pub mod handler;
            }
            pub mod render_chart {
                pub mod chart_request;
                pub mod handler;
                pub mod inbound {
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod chart_renderer;
                pub mod data_source;
                pub mod data_source_in_memory;
                pub mod fonts;
                pub mod github;
                pub mod plotters_renderer;
            }
        }
    }
}

pub mod shell;
