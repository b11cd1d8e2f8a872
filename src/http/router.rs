use regex::Regex;

type ParamsConverter<T> = Fn(Vec<&str>) -> Option<T>;

/// Matches a path against regexes in registration order
pub struct RouteParser<T> {
    routes: Vec<(Regex, Box<ParamsConverter<T>>)>,
}

impl<T> Default for RouteParser<T> {
    fn default() -> Self {
        Self { routes: vec![] }
    }
}

impl<T> RouteParser<T> {
    /// Adds a route without parameters. Patterns are static, so an invalid one is a programming error.
    pub fn add_route<F>(&mut self, pattern: &str, f: F)
    where
        F: Fn() -> T + 'static,
    {
        self.add_route_with_params(pattern, move |_| Some(f()));
    }

    /// Adds a route whose capture groups are handed to `converter`
    pub fn add_route_with_params<F>(&mut self, pattern: &str, converter: F)
    where
        F: Fn(Vec<&str>) -> Option<T> + 'static,
    {
        let regex = Regex::new(pattern).expect("Invalid route pattern");
        self.routes.push((regex, Box::new(converter)));
    }

    /// First route that matches and converts
    pub fn test(&self, path: &str) -> Option<T> {
        self.routes.iter().filter_map(|(regex, converter)| {
            regex.captures(path).and_then(|captures| {
                let params = captures
                    .iter()
                    .skip(1)
                    .filter_map(|m| m.map(|m| m.as_str()))
                    .collect::<Vec<_>>();
                converter(params)
            })
        }).next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum TestRoute {
        Cart,
        CartItem(u32),
    }

    #[test]
    fn matches_in_registration_order() {
        let mut router = RouteParser::default();
        router.add_route(r"^/cart$", || TestRoute::Cart);
        router.add_route_with_params(r"^/cart/items/(\d+)$", |params| {
            params.into_iter().next().and_then(|id| id.parse().ok()).map(TestRoute::CartItem)
        });

        assert_eq!(router.test("/cart"), Some(TestRoute::Cart));
        assert_eq!(router.test("/cart/items/42"), Some(TestRoute::CartItem(42)));
        assert_eq!(router.test("/cart/items/abc"), None);
        assert_eq!(router.test("/unknown"), None);
    }
}
