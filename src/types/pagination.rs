use std::collections::HashMap;

use handle_errors::Error;

/// Window over a list of questions. `limit: None` returns everything past `offset`.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct Pagination {
    pub limit: Option<u32>,
    pub offset: u32,
}

impl Pagination {
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let rest = items.into_iter().skip(self.offset as usize);
        match self.limit {
            Some(limit) => rest.take(limit as usize).collect(),
            None => rest.collect(),
        }
    }
}

/// Reads the optional `limit` and `offset` query parameters.
pub fn extract_pagination(params: HashMap<String, String>) -> Result<Pagination, Error> {
    let limit = params
        .get("limit")
        .map(|limit| limit.parse::<u32>())
        .transpose()
        .map_err(Error::ParseError)?;
    let offset = params
        .get("offset")
        .map(|offset| offset.parse::<u32>())
        .transpose()
        .map_err(Error::ParseError)?
        .unwrap_or(0);

    Ok(Pagination { limit, offset })
}

#[cfg(test)]
mod pagination_tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn no_params_means_everything() {
        let pagination = extract_pagination(HashMap::new()).unwrap();
        assert_eq!(pagination, Pagination::default());
        assert_eq!(pagination.apply(vec![1, 2, 3]), vec![1, 2, 3]);
    }

    #[test]
    fn limit_and_offset() {
        let pagination = extract_pagination(params(&[("limit", "2"), ("offset", "1")])).unwrap();
        assert_eq!(
            pagination,
            Pagination {
                limit: Some(2),
                offset: 1
            }
        );
        assert_eq!(pagination.apply(vec![1, 2, 3, 4]), vec![2, 3]);
    }

    #[test]
    fn offset_alone() {
        let pagination = extract_pagination(params(&[("offset", "5")])).unwrap();
        assert_eq!(pagination.limit, None);
        assert!(pagination.apply(vec![1, 2, 3]).is_empty());
    }

    #[test]
    fn unparsable_limit() {
        let result = extract_pagination(params(&[("limit", "-1")]));
        assert!(matches!(result, Err(Error::ParseError(_))));
    }
}
