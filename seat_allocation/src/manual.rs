/*!

This is the long-form manual for `seat_allocation` and `hondtgrp`.

## How seats are computed

Every district is processed on its own:

1. each party is placed in its group (the first group of its definition, or
   the group chosen by the user). A party with no definition goes to the
   `OTHER` group.
2. the votes of the parties are added by group, and the certified seats of
   all the parties of the district are added into the number of seats to
   distribute.
3. the seats are distributed between the groups with the D'Hondt method.
   Blank (`Votos em branco`) and null (`Votos nulos`) ballots are never
   candidates. When two groups have the same quotient, the group that was seen
   first in the district gets the seat.

The national row (`Total nacional`) adds the votes and seats of every group
over all the districts.

## Percentages

The percentages do not have the same meaning on every row:

- for a district, the percentage of a group is its share of the **seats** of
  the district.
- for the national row, it is the share of **all the votes**, blank and null
  ballots included, so the national percentages add up to 100.

The national ranking (`FullResults::national_ranking`) leaves the blank and
null ballots out and reports the share of the valid votes.

When there is nothing to divide by (a district with no seat, an election with
no vote), the percentages are reported as 0 and the table is flagged with
`zero_denominator`.

## Input formats

### Results

The results can be read from:
* `csv` a file with a header row and the columns `distrito`, `partido`,
  `votos`, `mandatos`. The names of the columns can be changed in the
  configuration. The `mandatos` column is optional.
* `xlsx` an Excel spreadsheet with the same columns. The first worksheet is
  read unless a worksheet name is given.
* `json` an object of districts, each an object of parties:

```json
{
  "Beja": {
    "PS": {"votos": 500, "mandatos": 1},
    "CH": {"votos": 300, "mandatos": 1}
  }
}
```

Votes and seats must be non-negative integers. Numbers written as strings
are accepted. A district may not distribute more than `MAX_DISTRICT_SEATS`
(10 000) seats.

### Party definitions

An object that gives the list of possible groups of every party. The first
group is the default one. A comma-separated string is also accepted:

```json
{
  "PPD/PSD.CDS-PP": ["PPD+CDS+IL"],
  "IL": "PPD+CDS+IL, IL",
  "PS": ["PS"]
}
```

The blank and null ballots are always added, in a group of their own.

## Configuration

The configuration file is a JSON file:

```json
{
  "outputSettings": {
    "contestName": "Legislativas 2025",
    "contestDate": "2025-05-18"
  },
  "dataSources": [
    {"provider": "csv", "filePath": "resultadosporcirculo.csv"}
  ],
  "partiesFile": "partidos.json",
  "allocation": {"IL": "IL"}
}
```

- `dataSources`: `provider` is one of `csv`, `xlsx`, `json`. The optional
  `districtColumn`, `partyColumn`, `votesColumn` and `seatsColumn` rename the
  columns, `excelWorksheetName` selects a worksheet.
- `parties` (inline) or `partiesFile`: the party definitions.
- `allocation`: overrides the group of some parties.

Paths are relative to the directory of the configuration file. The options
given on the command line take precedence.

*/
